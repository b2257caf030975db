//! Screen modules for different views

pub mod change_pin;
pub mod home;
pub mod login;
