use std::{fs::File, path::PathBuf};

use anyhow::{anyhow, Context};
use clap::{ArgAction, Parser};
use log::info;
use simplelog::{Config as LogConfig, LevelFilter, WriteLogger};

use snake::config::Config;
use snake::game::SnakeGame;
use snake::session::Session;

#[derive(Debug, Parser)]
#[command(author, version, about = "Snake on a wrapping grid, in the terminal", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,
    /// File receiving the game log, the terminal itself is taken by the game.
    #[arg(long, value_name = "PATH", default_value = "snake.log")]
    log_file: PathBuf,
    /// Log more detail (-v for debug, -vv for trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let session = Session::new(cli.config).context("refusing to start")?;
    let mut game = SnakeGame::new(session)?;

    // The terminal is restored even when the game loop fails
    let result = run(&mut game);
    let restored = game.restore();

    result?;
    restored?;
    info!("Bye");
    Ok(())
}

fn run(game: &mut SnakeGame) -> anyhow::Result<()> {
    game.initialize()?;
    if game.show_intro()? {
        game.play()?;
    }
    Ok(())
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let file = File::create(&cli.log_file)
        .with_context(|| format!("cannot create log file {}", cli.log_file.display()))?;
    WriteLogger::init(level, LogConfig::default(), file)
        .map_err(|err| anyhow!("failed to initialize logger: {}", err))?;

    info!("Starting snake");
    Ok(())
}
