//! Thermowatch CLI
//!
//! One-shot commands against a sensor service:
//! - Show the latest reading
//! - Show the history window with statistics
//! - Print a default config file

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::path::PathBuf;

use thermowatch::display::format::{chart_label, temperature_label, CELSIUS};
use thermowatch::display::{HistoryStats, StatsView, SummaryView, TrendIndicator};
use thermowatch::{
    generate_default_config, logging, ClientState, Config, FetchError, HttpSensorSource, SensorSource,
};

#[derive(Parser)]
#[command(name = "thermowatch-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Query a temperature sensor service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sensor base URL (default: config file or THERMOWATCH_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the latest reading and trend
    Latest,

    /// Show the recent history window
    History {
        /// Only print the statistics
        #[arg(long)]
        stats_only: bool,
    },

    /// Print a default config file
    Config {
        /// Write to this path instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = Config::load_default()?;
    if let Some(url) = cli.base_url {
        config.source.base_url = url;
    }
    logging::init(&config.logging);

    match cli.command {
        Commands::Latest => {
            let source = HttpSensorSource::new(&config.source)?;
            let reading = match source.fetch_latest().await {
                Ok(reading) => reading,
                Err(e) => exit_with(&config, e),
            };

            match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&reading)?);
                }
                OutputFormat::Table => {
                    let mut state = ClientState::new();
                    state.data = Some(reading);
                    state.loading = false;
                    let view = SummaryView::from_state(&state);

                    let value = if view.has_value {
                        format!("{}{}", view.temperature, view.unit)
                    } else {
                        view.temperature
                    };
                    println!("Temperature: {}", value);
                    println!("Time:        {}", view.time);
                    match view.trend {
                        Some(TrendIndicator { glyph, label, .. }) => {
                            println!("Trend:       {} {}", glyph, label)
                        }
                        None => println!("Trend:       stable"),
                    }
                }
            }
        }

        Commands::History { stats_only } => {
            let source = HttpSensorSource::new(&config.source)?;
            let window = match source.fetch_history().await {
                Ok(window) => window,
                Err(e) => exit_with(&config, e),
            };
            let stats = HistoryStats::from_window(&window);

            match cli.format {
                OutputFormat::Json => {
                    let body = if stats_only {
                        json!({ "stats": stats })
                    } else {
                        json!({ "window": window, "stats": stats })
                    };
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                OutputFormat::Table => {
                    if !stats_only {
                        if window.is_empty() {
                            println!("No readings in the history window.");
                        } else {
                            println!("{:<8} {:>10}", "Time", "Value");
                            println!("{}", "-".repeat(19));
                            for reading in window.readings() {
                                println!(
                                    "{:<8} {:>10}",
                                    chart_label(&reading.timestamp),
                                    temperature_label(reading.value)
                                );
                            }
                        }
                        println!();
                        println!("Reported count: {}", window.count);
                    }

                    match stats {
                        Some(stats) => {
                            let view = StatsView::from(&stats);
                            println!("Current: {}{}", view.current, CELSIUS);
                            println!("Average: {}{}", view.average, CELSIUS);
                            println!("Range:   {}{}", view.range, CELSIUS);
                            println!("Samples: {}", stats.samples);
                        }
                        None => println!("No statistics: window has no values."),
                    }
                }
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)?;
                    println!("Wrote default config to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn exit_with(config: &Config, error: FetchError) -> ! {
    if error.is_network() {
        eprintln!("Cannot reach sensor service at {}", config.source.base_url);
        eprintln!("Error: {}", error);
        eprintln!();
        eprintln!("Check the base URL or set THERMOWATCH_BASE_URL.");
    } else {
        eprintln!("Request failed: {}", error);
    }
    std::process::exit(1);
}

