use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Cli;
use crate::error::AppError;
use crate::gpio::Board;

mod app;
mod config;
mod error;
mod gpio;
mod ui;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let board = open_board(&cli).context("cannot set up the traffic light pins")?;

    let result = app::run_terminal(&board).await;
    if let Err(e) = &result {
        error!("window closed with an error: {}", e);
    }
    drop(board);
    info!("finished");

    result.context("traffic light window failed")
}

fn open_board(cli: &Cli) -> Result<Board, AppError> {
    if cli.simulate {
        return Ok(Board::simulated());
    }
    Ok(Board::open()?)
}

fn init_logging(cli: &Cli) -> Result<(), AppError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cli.log_file)
        .map_err(|source| AppError::LogFile {
            path: cli.log_file.clone(),
            source,
        })?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}
