//! resonator - play the resonator voice pool from the terminal
//!
//! Run with: cargo run --release
//! Logs go to `resonator.log`, filtered by `RUST_LOG`.

mod app;
mod ui;

use std::{fs::File, sync::Mutex};

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use resonator_dsp::SampleBanks;
use tracing_subscriber::EnvFilter;

use app::Player;

const LOG_FILE: &str = "resonator.log";

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    init_logging()?;

    Player::new(SampleBanks::factory()).run()
}

/// The terminal belongs to the UI, so tracing writes to a file.
fn init_logging() -> EyreResult<()> {
    let file = File::create(LOG_FILE).wrap_err_with(|| format!("failed to create {LOG_FILE}"))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
