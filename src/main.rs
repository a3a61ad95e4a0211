//! Crust command-line interface

use std::io;

use anyhow::Result;

use crust::{commands, config::CrustConfig, logging};

/// Crust entry point
pub fn main() -> Result<()> {
    let config = match CrustConfig::load() {
        Ok(config) => config,
        Err(err) => err.exit(),
    };

    logging::init_subscriber(&config.logging)?;

    let stdout = io::stdout();
    let handle = stdout.lock();

    commands::run(&config, handle)?;

    Ok(())
}
