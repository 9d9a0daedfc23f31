use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tube_downloader_lib::console::{self, Command};
use tube_downloader_lib::downloader::backends::{BellCueNotifier, LogCueNotifier};
use tube_downloader_lib::downloader::traits::CueNotifier;
use tube_downloader_lib::{Phase, Session, SessionConfig};

#[derive(Parser, Debug)]
#[command(name = "tube-downloader", version, about = "Simulated YouTube downloader")]
struct Cli {
    /// Settings file holding the theme preference
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Seed for the simulated download (reproducible progress)
    #[arg(long)]
    seed: Option<u64>,

    /// Run every delay ten times faster
    #[arg(long)]
    fast: bool,

    /// Keep the theme preference in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Ring the terminal bell on download start and completion
    #[arg(long)]
    bell: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they don't interleave with the UI on stdout
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = SessionConfig::default().with_seed(cli.seed);
    if let Some(path) = cli.settings {
        config = config.with_settings_path(path);
    }
    if cli.fast {
        config = config.with_time_scale(0.1);
    }

    let notifier: Box<dyn CueNotifier> = if cli.bell {
        Box::new(BellCueNotifier)
    } else {
        Box::new(LogCueNotifier)
    };
    let session = if cli.ephemeral {
        Session::start_in_memory(config, notifier)
    } else {
        Session::start(config, notifier)
    };

    // Re-render on phase changes; redraw only the bar while downloading
    let mut updates = session.subscribe();
    let watcher = tokio::spawn(async move {
        let mut last_phase = updates.borrow_and_update().phase;
        while updates.changed().await.is_ok() {
            let snap = updates.borrow_and_update().clone();
            if snap.phase != last_phase {
                println!("{}", console::render(&snap));
                last_phase = snap.phase;
            } else if snap.phase == Phase::Downloading {
                if let Some(percent) = snap.progress {
                    println!("  {}", console::progress_line(percent, snap.speed_label.as_deref()));
                }
            }
        }
    });

    println!("{}", console::render(&session.snapshot()));
    println!("Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match console::parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(msg) => {
                println!("{}", msg);
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => println!("{}", console::HELP),
            Command::Show => println!("{}", console::render(&session.snapshot())),
            Command::History => println!("{}", console::render_history(&session.snapshot())),
            Command::Intent(intent) => {
                let phase_before = session.snapshot().phase;
                match session.send(intent).await {
                    Ok(()) => {
                        let snap = session.snapshot();
                        // Phase changes are printed by the watcher
                        if snap.phase == phase_before {
                            println!("{}", console::render(&snap));
                        }
                    }
                    Err(e) if e.is_user_facing() => {
                        println!("{}", console::render(&session.snapshot()))
                    }
                    Err(e) => println!("{}", e),
                }
            }
        }
    }

    watcher.abort();
    Ok(())
}
