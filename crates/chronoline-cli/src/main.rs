//! chronoline CLI: personal timeline with a terminal UI

use chronoline_engine::{
    display_date, export_to_dir, import_from_file, open_store, Config, EventRecord, EventStore,
    ImportError, ImportPolicy, Period, StartupReport,
};
use clap::{Parser, Subcommand};
use std::error::Error;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `chronoline=debug`.
const LOG_ENV: &str = "CHRONOLINE_LOG";

type CmdResult = Result<(), Box<dyn Error>>;

/// Personal timeline with events, dates and places
#[derive(Parser)]
#[command(name = "chronoline")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI (default when no command specified)
    Tui,

    /// Print all events in chronological order
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write all events to a JSON file
    Export {
        /// Directory to write into (defaults to the configured export dir)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Replace all events with the contents of a JSON file
    Import {
        /// JSON file holding an array of events
        file: PathBuf,

        /// Import the valid records and skip the rest
        #[arg(long)]
        skip_invalid: bool,
    },

    /// Print the config, data, export and log locations
    Paths,
}

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(Config::default_path);

    let config = match Config::load_or_default(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config {}: {e}", config_path.display());
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        None | Some(Commands::Tui) => cmd_tui(config),
        Some(Commands::List { json }) => {
            init_stderr_logging();
            cmd_list(&config, json)
        }
        Some(Commands::Export { output }) => {
            init_stderr_logging();
            cmd_export(&config, output.as_deref())
        }
        Some(Commands::Import { file, skip_invalid }) => {
            init_stderr_logging();
            cmd_import(&config, &file, skip_invalid)
        }
        Some(Commands::Paths) => {
            cmd_paths(&config, &config_path);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn log_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

/// The TUI owns the terminal, so logs go to a file in the data dir.
fn init_file_logging(path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn cmd_tui(config: Config) -> CmdResult {
    if let Err(e) = init_file_logging(&config.log_path()) {
        // Logging is best effort; the TUI still runs.
        eprintln!("Warning: could not open log file: {e}");
    }
    info!(version = env!("CARGO_PKG_VERSION"), "chronoline starting");

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(chronoline_tui::run_tui(config))
}

/// Open the store, reporting a recovery on stderr.
fn open_reporting(config: &Config) -> Result<EventStore, Box<dyn Error>> {
    let (store, report) = open_store(config)?;
    if let StartupReport::Recovered { backup, reason } = report {
        warn!(%reason, "Stored events were unreadable");
        eprintln!("Warning: stored events were unreadable ({reason}); starting empty.");
        if let Some(backup) = backup {
            eprintln!("The unreadable file was kept at {}", backup.display());
        }
    }
    Ok(store)
}

/// One line of the plain listing.
fn format_record_line(record: &EventRecord) -> String {
    let when = match Period::from_bounds(record.start, record.end) {
        Some(period) => period.to_string(),
        None => display_date(record.start),
    };
    match &record.location {
        Some(location) => format!("{when}  {}  @ {}", record.title, location.name),
        None => format!("{when}  {}", record.title),
    }
}

fn cmd_list(config: &Config, json: bool) -> CmdResult {
    let store = open_reporting(config)?;
    let records = store.chronological();

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No events yet.");
        return Ok(());
    }
    for record in records {
        println!("{}", format_record_line(record));
    }
    Ok(())
}

fn cmd_export(config: &Config, output: Option<&Path>) -> CmdResult {
    let store = open_reporting(config)?;
    let dir = output.unwrap_or(&config.export_dir);
    let path = export_to_dir(dir, store.records())?;
    println!("Exported {} events to {}", store.len(), path.display());
    Ok(())
}

fn cmd_import(config: &Config, file: &Path, skip_invalid: bool) -> CmdResult {
    let policy = if skip_invalid {
        ImportPolicy::SkipInvalid
    } else {
        config.import_policy
    };

    let outcome = match import_from_file(file, policy) {
        Ok(outcome) => outcome,
        Err(ImportError::InvalidRecords(issues)) => {
            for issue in &issues {
                eprintln!("  {issue}");
            }
            eprintln!("Nothing was imported. Use --skip-invalid to import the valid records.");
            return Err(Box::new(ImportError::InvalidRecords(issues)));
        }
        Err(e) => return Err(Box::new(e)),
    };

    let mut store = open_reporting(config)?;
    let count = outcome.records.len();
    store.replace_all(outcome.records)?;

    println!("Imported {count} events from {}", file.display());
    if !outcome.skipped.is_empty() {
        println!("Skipped {} invalid records:", outcome.skipped.len());
        for issue in &outcome.skipped {
            println!("  {issue}");
        }
    }
    Ok(())
}

fn cmd_paths(config: &Config, config_path: &Path) {
    println!("Config:  {}", config_path.display());
    println!(
        "Data:    {}",
        config
            .data_dir
            .join(format!("{}.json", config.storage_key))
            .display()
    );
    println!("Export:  {}", config.export_dir.display());
    println!("Log:     {}", config.log_path().display());
}
