use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::{info, Level};

use sideboard::config::Config;
use sideboard::demo::simulate;
use sideboard::engine::BoardEngine;

#[derive(Parser)]
#[command(name = "sideboard")]
#[command(about = "Per-player sidebar scoreboards for multiplayer terminal games")]
#[command(version)]
pub struct Cli {
    /// File that receives log output (the terminal belongs to the UI)
    #[arg(long, global = true, default_value = "sideboard.log")]
    pub log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a simulated match and watch each player's sidebar
    Demo {
        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Board title (overrides the config file)
        #[arg(short, long)]
        title: Option<String>,

        /// Number of simulated players
        #[arg(short, long)]
        players: Option<usize>,

        /// Milliseconds between match events
        #[arg(long)]
        tick_ms: Option<u64>,

        /// Seed for a reproducible match
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the effective configuration as JSON
    Config {
        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file, cli.verbose)?;

    match cli.command {
        Some(Commands::Demo {
            config,
            title,
            players,
            tick_ms,
            seed,
        }) => {
            let mut config = Config::load_or_default(config.as_deref())?;
            if let Some(title) = title {
                config.board.title = title;
            }
            if let Some(players) = players {
                config.demo.players = players;
            }
            if let Some(tick_ms) = tick_ms {
                config.demo.tick_ms = tick_ms;
            }
            if seed.is_some() {
                config.demo.seed = seed;
            }
            run_demo(config.sanitized()).await?;
        }

        Some(Commands::Config { config }) => {
            let config = Config::load_or_default(config.as_deref())?;
            println!("{}", config.to_pretty_json()?);
        }

        None => {
            run_demo(Config::default()).await?;
        }
    }

    Ok(())
}

async fn run_demo(config: Config) -> Result<()> {
    info!(title = %config.board.title, players = config.demo.players, "starting demo");

    let (event_tx, event_rx) = mpsc::channel(64);
    let simulation = tokio::spawn(simulate(config.demo.clone(), event_tx));

    let engine = BoardEngine::new(&config);
    let terminal = ratatui::init();
    let result = engine.run(terminal, event_rx).await;
    ratatui::restore();

    simulation.abort();
    result
}

fn init_logging(path: &Path, verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
