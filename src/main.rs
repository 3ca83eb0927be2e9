use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use mlbdash::commands;
use mlbdash::config::{self, Config};
use mlbdash::matchups::{MatchupMode, OptionRole};
use mlbdash::search::Filters;
use mlbdash::session::Session;
use mlbdash::tui;

// Default Configuration Constants
/// Default log level when not specified
const DEFAULT_LOG_LEVEL: &str = "info";

/// Default log file path (no logging to file)
const DEFAULT_LOG_FILE: &str = "/dev/null";

#[derive(Parser)]
#[command(name = "mlbdash")]
#[command(about = "Browser for a generated MLB stats site", long_about = "Browser for a generated MLB stats site\n\nIf no command is specified, the program starts in interactive mode.")]
struct Cli {
    /// Site root: a directory or an http(s) base URL (overrides config)
    #[arg(long, global = true)]
    site: Option<String>,

    /// Serve the built-in demo site instead of a real one
    #[cfg(feature = "development")]
    #[arg(long, global = true)]
    mock: bool,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    /// Log file path (default: /dev/null for no logging)
    #[arg(short = 'F', long, global = true, default_value = DEFAULT_LOG_FILE)]
    log_file: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a page and print its text
    Page {
        /// Page id or `#hash` (defaults to the last active page)
        page_id: Option<String>,

        /// List the page's scripts in revival order
        #[arg(long)]
        scripts: bool,
    },
    /// Resolve a matchup selection to its fragment
    Resolve {
        /// sp_vs_team, sp_vs_2, hitter_vs_pitcher, multi_hitter or rp_inning
        #[arg(short, long)]
        mode: MatchupMode,

        /// Season year (YYYY)
        #[arg(short, long)]
        year: String,

        /// Keys of a single-row selection, in layout order
        keys: Vec<String>,

        /// One row of a multi-row mode as "k1|k2|k3" (repeatable)
        #[arg(long = "row")]
        rows: Vec<String>,

        /// Print the fragment text as well as its path
        #[arg(long)]
        render: bool,
    },
    /// List the dropdown options for a year
    Options {
        /// Season year (defaults to the newest available)
        #[arg(short, long)]
        year: Option<String>,

        /// hitters, pitchers or teams
        #[arg(short, long, default_value = "pitchers")]
        role: OptionRole,

        /// Group players by team when the data allows it
        #[arg(short, long)]
        grouped: bool,
    },
    /// Print the sidebar tree for a search
    Search {
        /// Player name substring (empty shows the persisted tree)
        query: Option<String>,

        #[arg(long)]
        hide_minors: bool,

        /// Hide injured and suspended players
        #[arg(long)]
        hide_hurt: bool,
    },
    /// Print the year selector of a player page
    Years {
        page_id: String,
    },
    /// Display current configuration
    Config,
}

fn init_logging(log_level: &str, log_file: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
    {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", log_file, e);
            return;
        }
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Handle the config command - display current configuration
fn handle_config_command(cfg: &Config) {
    let (path_str, exists) = match config::get_config_path() {
        Some(path) => {
            let exists = path.exists();
            (path.display().to_string(), exists)
        }
        None => ("Unable to determine config path".to_string(), false),
    };

    println!("Configuration File: {} (Exists: {})", path_str, if exists { "yes" } else { "no" });
    println!();
    println!("Current Configuration:");
    println!("=====================");
    println!("log_level: {}", cfg.log_level);
    println!("log_file: {}", cfg.log_file);
    println!("site_root: {}{}", cfg.site_root, if cfg.site_is_remote() { " (http)" } else { "" });
    println!("default_page: {}", cfg.default_page);
    match cfg.state_path() {
        Some(path) => println!("state_file: {}", path.display()),
        None => println!("state_file: (memory only)"),
    }
    println!("prefetch_ahead: {}", cfg.prefetch_ahead);
    println!("time_format: {}", cfg.time_format);
    println!();
    println!("[theme]");
    println!("selection_fg: {:?}", cfg.theme.selection_fg);
    println!("heading_fg: {:?}", cfg.theme.heading_fg);
}

/// Resolve log configuration from CLI args and config file
/// CLI arguments take precedence over config file
fn resolve_log_config<'a>(cli: &'a Cli, config: &'a Config) -> (&'a str, &'a str) {
    let log_level = if cli.log_level != DEFAULT_LOG_LEVEL {
        cli.log_level.as_str()
    } else {
        config.log_level.as_str()
    };

    let log_file = if cli.log_file != DEFAULT_LOG_FILE {
        cli.log_file.as_str()
    } else {
        config.log_file.as_str()
    };

    (log_level, log_file)
}

fn create_session(cli: &Cli, config: &Config) -> anyhow::Result<Arc<Session>> {
    #[cfg(feature = "development")]
    if cli.mock {
        use mlbdash::dev::mock_site::MockSite;
        use mlbdash::store::MemoryStore;
        tracing::info!("Using the built-in mock site");
        let session = Session::new(Arc::new(MockSite::new()), Arc::new(MemoryStore::new()))
            .with_prefetch_ahead(config.prefetch_ahead)
            .with_default_page(&config.default_page);
        return Ok(Arc::new(session));
    }

    let mut config = config.clone();
    if let Some(site) = &cli.site {
        config.site_root = site.clone();
    }
    Ok(Session::from_config(&config)?)
}

/// Execute a CLI command by routing it to the appropriate command handler
async fn execute_command(session: &Session, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Config => unreachable!("Config command should be handled before execute_command"),
        Commands::Page { page_id, scripts } => commands::page::run(session, page_id, scripts).await,
        Commands::Resolve { mode, year, keys, rows, render } => {
            commands::resolve::run(session, mode, &year, keys, rows, render).await
        }
        Commands::Options { year, role, grouped } => {
            commands::options::run(session, year, role, grouped).await
        }
        Commands::Search { query, hide_minors, hide_hurt } => {
            commands::search::run(session, query, Filters { hide_minors, hide_hurt }).await
        }
        Commands::Years { page_id } => commands::years::run(session, &page_id).await,
    }
}

#[tokio::main]
async fn main() {
    let config = config::read();
    let mut cli = Cli::parse();

    // Resolve and initialize logging
    let (log_level, log_file) = resolve_log_config(&cli, &config);
    if log_file != DEFAULT_LOG_FILE {
        init_logging(log_level, log_file);
    }

    // Handle Config command separately (doesn't need a session)
    if let Some(Commands::Config) = cli.command {
        handle_config_command(&config);
        return;
    }

    let session = match create_session(&cli, &config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            tracing::error!("Failed to open site: {:#}", e);
            std::process::exit(1);
        }
    };

    // If no subcommand, run TUI
    let Some(command) = cli.command.take() else {
        if let Err(e) = tui::run(session, config).await {
            eprintln!("Error running TUI: {}", e);
            std::process::exit(1);
        }
        return;
    };

    if let Err(e) = execute_command(&session, command).await {
        eprintln!("Error: {:#}", e);
        tracing::error!("Command failed: {:#}", e);
        std::process::exit(1);
    }
}
