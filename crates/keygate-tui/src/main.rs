//! Keygate - terminal login screen
//!
//! `keygate` runs the login UI; `keygate enroll --username NAME` adds a user,
//! reading the PIN from stdin.

use std::fs::{self, File};
use std::io::{self, BufRead};
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use zeroize::Zeroizing;

use keygate_tui::app::TuiConfig;
use keygate_tui::auth::CredentialStore;
use keygate_tui::App;

const DEFAULT_LOG_FILTER: &str = "keygate_tui=info,keygate_core=info";

#[derive(Parser)]
#[command(name = "keygate", version, about = "Terminal login screen")]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show the login screen (default)
    Run,
    /// Enroll a user; the 5-digit PIN is read from stdin
    Enroll {
        #[arg(long)]
        username: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging()?;

    let config = match &cli.config {
        Some(path) => TuiConfig::load_from(path),
        None => TuiConfig::load(),
    };

    let result = match cli.command.unwrap_or(Command::Run) {
        Command::Run => run_tui(config),
        Command::Enroll { username } => enroll(&config, &username),
    };

    if let Err(e) = &result {
        tracing::error!("Application error: {:#}", e);
    }

    result
}

/// Log to a file; the terminal belongs to the UI
fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .context("Invalid log filter")?;

    let layer = fmt::layer().with_target(false).with_ansi(false);
    let registry = tracing_subscriber::registry().with(filter);

    match TuiConfig::log_file_path() {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            let file = File::options()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            registry.with(layer.with_writer(Mutex::new(file))).init();
        }
        None => registry.with(layer.with_writer(io::sink)).init(),
    }

    Ok(())
}

fn enroll(config: &TuiConfig, username: &str) -> Result<()> {
    let mut store = CredentialStore::load(config.credentials_path.clone()).with_context(|| {
        format!(
            "Failed to load credentials from {}",
            config.credentials_path.display()
        )
    })?;

    eprint!("PIN for {}: ", username);
    let mut line = Zeroizing::new(String::new());
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read PIN from stdin")?;
    let pin = line.trim_end_matches(['\r', '\n']);

    store
        .enroll(username, pin)
        .with_context(|| format!("Failed to enroll {}", username))?;

    eprintln!("Enrolled {} in {}", username, store.path().display());
    Ok(())
}

fn run_tui(config: TuiConfig) -> Result<()> {
    // Restore the terminal before the default hook prints
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let _guard = runtime.enter();

    // Load before touching the terminal so errors print normally
    let mut app = App::new(config)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    drop(app);
    result
}
