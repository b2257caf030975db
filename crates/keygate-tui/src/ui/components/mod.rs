//! Reusable UI components

pub mod notification;
pub mod text_field;
