use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use updown_game::config::CliConfig;
use updown_game::{Config, FileStore, GameInterface, HighScoreStore, VERSION};

#[derive(Parser)]
#[command(name = "updown")]
#[command(about = "Press the shown direction before the deadline runs out")]
#[command(version = VERSION)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Seed for the prompt sequence
    #[arg(long)]
    seed: Option<u64>,

    /// Colour theme
    #[arg(short, long)]
    theme: Option<String>,

    /// High score file
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Go straight to the play screen
    #[arg(short, long)]
    play: bool,

    /// Print the stored high score and exit
    #[arg(long)]
    high_score: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config.as_deref() {
        Some(path) if !Path::new(path).exists() => Config::from_file(path)?,
        path => Config::load_layered(path)?,
    };
    config.merge_with_cli(CliConfig {
        seed: cli.seed,
        data_file: cli.data_file,
        log_level: None,
        debug: cli.debug,
        theme: cli.theme,
    });

    tracing_subscriber::fmt()
        .with_env_filter(format!("updown_game={},warn", config.logging.level))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting updown v{}", VERSION);

    if cli.high_score {
        let store = FileStore::new(config.get_data_file());
        let high_score = store.persist_read(config.storage.high_score_key)?;
        println!("High Score: {}", high_score);
        return Ok(());
    }

    let mut game_interface = GameInterface::new(config).await?;

    let outcome = if cli.play {
        game_interface.play().await
    } else {
        game_interface.run().await
    };

    if let Err(e) = outcome {
        error!("Game error: {}", e);
        eprintln!("An error occurred: {}", e);
        std::process::exit(1);
    }

    info!("Game session ended");
    Ok(())
}
