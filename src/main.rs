// LogLens - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading and logging initialisation
// 3. Dispatch to the analysis pipeline or the history ledger
//
// Reports go to stdout; diagnostics go to stderr via tracing.

use clap::{Parser, Subcommand};
use loglens::app::analysis::{self, AnalysisReport};
use loglens::core::export;
use loglens::core::history::HistoryLedger;
use loglens::core::model::{HistoryEntry, HistoryUpdate};
use loglens::platform::config::{self, AppConfig, PlatformPaths};
use loglens::platform::store::FileStore;
use loglens::util::{self, error::LogLensError};
use std::io::Write;
use std::path::{Path, PathBuf};

/// LogLens - security log analyser and upload history.
///
/// Parses an unstructured log file into records, summarises them by hour and
/// severity, and keeps a durable history of uploaded files.
#[derive(Parser, Debug)]
#[command(name = "loglens", version, about)]
struct Cli {
    /// Directory containing config.toml (defaults to the platform config dir).
    #[arg(short = 'c', long = "config-dir", global = true)]
    config_dir: Option<PathBuf>,

    /// History ledger file (overrides config and the platform default).
    #[arg(short = 'l', long = "ledger", global = true)]
    ledger: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a log file and print its summary, time series and severity mix.
    Analyze {
        /// Log file to analyse.
        file: PathBuf,

        /// Print the report as JSON instead of text.
        #[arg(long)]
        json: bool,

        /// Also write all parsed records to this CSV file.
        #[arg(long = "export-csv")]
        export_csv: Option<PathBuf>,
    },

    /// Manage the upload/chat history ledger.
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryAction {
    /// List entries, newest first.
    List {
        /// Print entries as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Record a file upload (runs the upload size/type checks first).
    Add {
        /// File being uploaded.
        file: PathBuf,
    },

    /// Update the message count and/or last message of an entry.
    Update {
        id: u64,

        #[arg(long = "messages")]
        message_count: Option<u32>,

        #[arg(long = "last-message")]
        last_message: Option<String>,
    },

    /// Delete an entry.
    Delete { id: u64 },
}

fn main() {
    let cli = Cli::parse();

    let platform_paths = PlatformPaths::resolve();
    let config_dir = cli
        .config_dir
        .clone()
        .unwrap_or_else(|| platform_paths.config_dir.clone());
    let (app_config, config_warnings) = config::load_config(&config_dir);

    util::logging::init(cli.debug, app_config.log_level.as_deref());
    for warning in &config_warnings {
        tracing::warn!(error = %warning, "Configuration warning");
    }

    tracing::debug!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "LogLens starting"
    );

    let ledger_path = cli
        .ledger
        .clone()
        .unwrap_or_else(|| app_config.ledger_path(&platform_paths));

    if let Err(e) = run(cli.command, &app_config, &ledger_path) {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(command: Command, config: &AppConfig, ledger_path: &Path) -> util::error::Result<()> {
    match command {
        Command::Analyze {
            file,
            json,
            export_csv,
        } => {
            let (records, report) = analysis::analyze_file(&file, config.preview_rows)?;

            if let Some(csv_path) = export_csv {
                let out = std::fs::File::create(&csv_path).map_err(|source| {
                    LogLensError::Export(util::error::ExportError::Io {
                        path: csv_path.clone(),
                        source,
                    })
                })?;
                let count = export::export_csv(&records, std::io::BufWriter::new(out), &csv_path)?;
                tracing::info!(path = %csv_path.display(), records = count, "Records exported");
            }

            if json {
                export::export_json(&report, std::io::stdout().lock(), Path::new("<stdout>"))?;
                println!();
            } else {
                print_report(&report);
            }
            Ok(())
        }

        Command::History { action } => {
            let mut ledger = HistoryLedger::new(FileStore::new(ledger_path));
            match action {
                HistoryAction::List { json } => {
                    let entries = ledger.list();
                    if json {
                        export::export_json(
                            &entries,
                            std::io::stdout().lock(),
                            Path::new("<stdout>"),
                        )?;
                        println!();
                    } else {
                        print_history(&entries);
                    }
                }
                HistoryAction::Add { file } => {
                    let descriptor = analysis::describe_file(&file)?;
                    config.upload.check(&descriptor)?;
                    let entry = ledger.create(&descriptor)?;
                    println!("Recorded {} as #{}", entry.file_name, entry.id);
                }
                HistoryAction::Update {
                    id,
                    message_count,
                    last_message,
                } => {
                    let update = HistoryUpdate {
                        message_count,
                        last_message,
                    };
                    if update.is_empty() {
                        tracing::warn!(id, "Nothing to update");
                    }
                    ledger.update(id, update)?;
                }
                HistoryAction::Delete { id } => {
                    ledger.delete(id)?;
                }
            }
            Ok(())
        }
    }
}

fn print_report(report: &AnalysisReport) {
    // Broken pipes (e.g. `| head`) are not worth reporting.
    let _ = write_report(&mut std::io::stdout().lock(), report);
}

fn write_report<W: Write>(out: &mut W, report: &AnalysisReport) -> std::io::Result<()> {
    let summary = &report.summary;
    writeln!(out, "File:          {}", report.file_name)?;
    writeln!(out, "Total logs:    {}", summary.total)?;
    writeln!(out, "Errors:        {}", summary.errors)?;
    writeln!(out, "Time range:    {}", summary.time_range_label())?;
    writeln!(out, "Success rate:  {}", summary.success_rate_label())?;

    writeln!(out, "\nEvents by hour:")?;
    for bucket in &report.time_series {
        writeln!(out, "  {:>5}  {}", bucket.label(), bucket.count)?;
    }

    writeln!(out, "\nSeverity distribution:")?;
    for entry in &report.severity_distribution {
        writeln!(out, "  {:<5}  {}", entry.severity.label(), entry.count)?;
    }

    writeln!(out, "\nRecent entries:")?;
    for record in &report.preview {
        writeln!(
            out,
            "  {}  {:<5}  {}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            record.severity.label(),
            record.message
        )?;
    }
    Ok(())
}

fn print_history(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("No history found. Add a file to start analysing logs.");
        return;
    }
    for entry in entries {
        let last = if entry.last_message.is_empty() {
            "No messages yet"
        } else {
            entry.last_message.as_str()
        };
        println!(
            "#{}  {}  {:.2} MB  {}  {}  {} messages  {}",
            entry.id,
            entry.file_name,
            entry.file_size as f64 / 1024.0 / 1024.0,
            entry.file_type.to_uppercase(),
            entry.created_at.format("%b %e, %Y %H:%M"),
            entry.message_count,
            last
        );
    }
}
