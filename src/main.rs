use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};

use sleeplog::advice::{Advice, Polarity};
use sleeplog::error::ErrorSeverity;
use sleeplog::export::{export_records, DateRange, ExportFormat};
use sleeplog::models::{parse_clock, parse_date, SleepRecord};
use sleeplog::{AppConfig, LogLevel, SleepJournal, SleepLogError, SleepQuality, UpsertOutcome};

/// SleepLog - Nightly Sleep Journal CLI
///
/// Records bedtime, wake time and sleep quality once per night and turns
/// them into summary statistics and rule-based advice.
#[derive(Parser)]
#[command(name = "sleeplog")]
#[command(author = "SleepLog Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Nightly sleep journal", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record one night (replaces an existing record for the same date)
    Record {
        /// Night's date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,

        /// Bedtime (HH:MM)
        #[arg(short, long, default_value = "23:00")]
        bedtime: String,

        /// Wake time (HH:MM)
        #[arg(short, long, default_value = "07:00")]
        waketime: String,

        /// Sleep quality: 1 very poor, 2 poor, 3 average, 4 good, 5 very good
        #[arg(short, long, default_value = "3", allow_negative_numbers = true)]
        quality: i64,
    },

    /// List recorded nights, newest first
    List {
        /// Number of nights to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Show averages and the latest night
    Stats,

    /// Advice for the latest night and the recent trend
    Advise {
        /// Print structured advice as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export recorded nights
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Export format (csv, json)
        #[arg(short = 'f', long, default_value = "csv")]
        format: String,

        /// Date range start (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Date range end (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },

    /// Configure application settings
    Config {
        /// List all configuration options
        #[arg(short, long)]
        list: bool,

        /// Set a configuration value (KEY=VALUE)
        #[arg(short, long)]
        set: Option<String>,

        /// Get a configuration value
        #[arg(short, long)]
        get: Option<String>,
    },
}

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Bedtime")]
    bedtime: String,
    #[tabled(rename = "Wake time")]
    waketime: String,
    #[tabled(rename = "Slept")]
    slept: String,
    #[tabled(rename = "Quality")]
    quality: String,
}

impl From<&SleepRecord> for RecordRow {
    fn from(record: &SleepRecord) -> Self {
        RecordRow {
            date: record.date.to_string(),
            bedtime: record.bedtime.format("%H:%M").to_string(),
            waketime: record.waketime.format("%H:%M").to_string(),
            slept: format!("{:.1}h", record.sleep_duration_hours),
            quality: record.sleep_quality.stars(),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        report_error(&err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_config_path);
    let mut config = AppConfig::load_or_default(&config_path)?;

    let mut log_config = config.logging.clone();
    if cli.verbose > 0 {
        log_config.level = LogLevel::from_verbosity(cli.verbose);
        eprintln!("{}", format!("Log level: {}", log_config.level.to_filter()).dimmed());
    }
    sleeplog::logging::init_logging(&log_config)?;

    let mut journal = SleepJournal::with_trend_window(config.record_store(), config.advice.trend_window);

    match cli.command {
        Commands::Record {
            date,
            bedtime,
            waketime,
            quality,
        } => {
            let date = match date {
                Some(d) => parse_date(&d).map_err(SleepLogError::from)?,
                None => Local::now().date_naive(),
            };
            let bedtime = parse_clock(&bedtime).map_err(SleepLogError::from)?;
            let waketime = parse_clock(&waketime).map_err(SleepLogError::from)?;
            let quality = SleepQuality::new(quality).map_err(SleepLogError::from)?;

            let recorded = journal.record(date, bedtime, waketime, quality)?;
            let verb = match recorded.outcome {
                UpsertOutcome::Inserted => "saved",
                UpsertOutcome::Updated => "updated",
            };
            println!("{}", format!("✓ Record {}", verb).green().bold());
            println!(
                "  {}  {} → {}  {:.2}h  {}",
                recorded.record.date,
                recorded.record.bedtime.format("%H:%M"),
                recorded.record.waketime.format("%H:%M"),
                recorded.record.sleep_duration_hours,
                recorded.record.sleep_quality.stars()
            );
        }

        Commands::List { limit } => {
            let records = journal.records_newest_first()?;
            if records.is_empty() {
                print_no_data();
                return Ok(());
            }

            let rows: Vec<RecordRow> = records.iter().take(limit).map(RecordRow::from).collect();
            println!("{}", Table::new(rows).with(Style::rounded()));
            if records.len() > limit {
                println!("{}", format!("({} of {} nights shown)", limit, records.len()).dimmed());
            }
        }

        Commands::Stats => match journal.summary()? {
            Some(summary) => {
                println!("{}", "Sleep summary".cyan().bold());
                println!("  Nights recorded:  {}", summary.record_count);
                println!("  Average sleep:    {:.1}h", summary.avg_duration_hours);
                println!("  Average quality:  {:.1}/5", summary.avg_quality);
                println!(
                    "  Latest night:     {} ({:.1}h, {})",
                    summary.latest.date,
                    summary.latest.sleep_duration_hours,
                    summary.latest.sleep_quality
                );
            }
            None => print_no_data(),
        },

        Commands::Advise { json } => {
            let Some(latest) = journal.latest_advice()? else {
                print_no_data();
                return Ok(());
            };
            let trend = journal.trend_advice()?;

            if json {
                let payload = serde_json::json!({ "latest": latest, "trend": trend });
                println!("{}", serde_json::to_string_pretty(&payload)?);
                return Ok(());
            }

            println!("{}", "Advice for the latest night".cyan().bold());
            print_advice(&latest);

            println!();
            match trend {
                Some(trend) => {
                    println!(
                        "{}",
                        format!("Trend over the last {} nights", journal.trend_window())
                            .cyan()
                            .bold()
                    );
                    print_advice(&trend);
                }
                None => println!(
                    "{}",
                    format!(
                        "Trend advice appears once {} nights are recorded.",
                        journal.trend_window()
                    )
                    .dimmed()
                ),
            }
        }

        Commands::Export {
            output,
            format,
            from,
            to,
        } => {
            let format: ExportFormat = format.parse().map_err(SleepLogError::from)?;
            let range = DateRange::new(
                from.as_deref().map(parse_date).transpose().map_err(SleepLogError::from)?,
                to.as_deref().map(parse_date).transpose().map_err(SleepLogError::from)?,
            );

            let records = journal.records_newest_first()?;
            let written = export_records(&records, &range, format, &output)
                .map_err(SleepLogError::from)?;
            println!(
                "{}",
                format!("✓ Exported {} nights to {}", written, output.display()).yellow()
            );
        }

        Commands::Config { list, set, get } => {
            if list {
                println!("{}", format!("Configuration ({})", config_path.display()).white().bold());
                for (key, value) in config.entries() {
                    println!("  {} = {}", key, value);
                }
            } else if let Some(key_value) = set {
                let (key, value) = key_value
                    .split_once('=')
                    .context("Expected KEY=VALUE")?;
                config.set(key.trim(), value.trim())?;
                config.save_to_file(&config_path)?;
                println!("{}", format!("✓ {} = {}", key.trim(), value.trim()).white());
            } else if let Some(key) = get {
                println!("{}", config.get(&key)?);
            } else {
                println!("Use --list, --get KEY or --set KEY=VALUE");
            }
        }
    }

    Ok(())
}

fn print_no_data() {
    println!(
        "{}",
        "No sleep data yet. Record a night with `sleeplog record`.".dimmed()
    );
}

fn print_advice(advice: &[Advice]) {
    for item in advice {
        let line = if item.kind.is_tip() {
            format!("    • {}", item.message())
        } else {
            format!("  {}", item.message())
        };

        match item.polarity {
            Polarity::Positive => println!("{}", line.green()),
            Polarity::Warning => println!("{}", line.yellow()),
            Polarity::Neutral => println!("{}", line),
        }
    }
}

fn report_error(err: &anyhow::Error) {
    match err.downcast_ref::<SleepLogError>() {
        Some(sleep_err) => {
            match sleep_err.severity() {
                ErrorSeverity::Critical | ErrorSeverity::Error => {
                    tracing::error!(error = %sleep_err, "Command failed")
                }
                ErrorSeverity::Warning => tracing::warn!(error = %sleep_err, "Command rejected"),
                ErrorSeverity::Info => tracing::info!(error = %sleep_err, "Command skipped"),
            }
            eprintln!("{} {}", "✗".red().bold(), sleep_err.user_message().red());
        }
        None => eprintln!("{} {:#}", "✗".red().bold(), err),
    }
}
