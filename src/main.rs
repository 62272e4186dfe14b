//! Thermowatch Dashboard
//!
//! Live terminal dashboard: mounts both pollers and redraws on every change.
//!
//! Keys (followed by Enter): `r` retry history, `t` toggle theme, `q` quit.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

use thermowatch::{
    logging, Config, HttpSensorSource, ManualTheme, Monitor, PollOutcome, TerminalRenderer, Theme,
};

#[derive(Parser)]
#[command(name = "thermowatch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Live temperature dashboard for a remote sensor")]
struct Args {
    /// Config file (default: standard locations, then environment)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sensor base URL, overrides the config file
    #[arg(long)]
    base_url: Option<String>,

    /// Chart theme (light, dark)
    #[arg(long)]
    theme: Option<Theme>,

    /// Disable ANSI colours
    #[arg(long)]
    no_color: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let (mut config, loaded_from) = match &args.config {
        Some(path) => (
            Config::load_with_env(path).context("Failed to load configuration")?,
            Some(path.clone()),
        ),
        None => match Config::load_first(&Config::search_paths())
            .context("Failed to load configuration")?
        {
            Some((config, path)) => (config, Some(path)),
            None => (Config::from_env(), None),
        },
    };
    if let Some(url) = args.base_url {
        config.source.base_url = url;
    }
    if let Some(theme) = args.theme {
        config.display.theme = theme;
    }

    logging::init(&config.logging);
    tracing::info!("Thermowatch v{}", env!("CARGO_PKG_VERSION"));
    match &loaded_from {
        Some(path) => tracing::info!("Loaded config from {:?}", path),
        None => tracing::info!("Using default config with environment overrides"),
    }
    tracing::info!("Sensor source: {}", config.source.base_url);

    let source = HttpSensorSource::new(&config.source).context("Failed to create sensor client")?;
    let theme = Arc::new(ManualTheme::new(config.display.theme));
    let monitor = Monitor::start(&config.polling, Arc::new(source), theme.clone());
    let renderer = TerminalRenderer::new(!args.no_color);

    let mut latest_rx = monitor.latest().subscribe();
    let mut history_rx = monitor.history().subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut retry: Option<JoinHandle<PollOutcome>> = None;

    draw(&monitor, &renderer);

    loop {
        tokio::select! {
            changed = latest_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                draw(&monitor, &renderer);
            }
            changed = history_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                draw(&monitor, &renderer);
            }
            Some(joined) = async {
                match retry.as_mut() {
                    Some(handle) => Some(handle.await),
                    None => None,
                }
            }, if retry.is_some() => {
                retry = None;
                match joined {
                    Ok(PollOutcome::Updated) => {}
                    Ok(outcome) => tracing::info!("Retry finished: {:?}", outcome),
                    Err(e) => tracing::warn!("Retry task failed: {}", e),
                }
                draw(&monitor, &renderer);
            }
            line = lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(input)) => match input.trim() {
                        "r" if retry.is_none() => {
                            retry = Some(monitor.spawn_history_retry());
                        }
                        "t" => {
                            let next = theme.toggle();
                            tracing::info!("Switched to {} theme", next);
                            draw(&monitor, &renderer);
                        }
                        "q" => break,
                        _ => {}
                    },
                    Ok(None) => stdin_open = false,
                    Err(e) => {
                        tracing::warn!("Failed to read stdin: {}", e);
                        stdin_open = false;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    tracing::info!("Shutting down...");
    if let Some(handle) = retry {
        handle.abort();
    }
    monitor.shutdown();
    Ok(())
}

fn draw(monitor: &Monitor, renderer: &TerminalRenderer) {
    if renderer.color {
        print!("\x1b[2J\x1b[H");
    }
    println!("{}", renderer.summary(&monitor.summary_view()));
    println!("{}", renderer.history(&monitor.history_view()));
    println!();
}
