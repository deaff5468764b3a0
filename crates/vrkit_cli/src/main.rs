//! Entry point for the `vrkit` layout tool.

mod commands;
mod config;

use crate::config::{Command, Config};
use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    // Initialize logging; default to "info" if RUST_LOG is unset.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    log::debug!("Running with configuration {:?}", config);

    let output = match config.command {
        Command::TextureSize { size } => commands::texture_size(size)?,
        Command::ToVr { rect } => commands::to_vr(config.surface, rect)?,
        Command::ToScreen { pose, size } => commands::to_screen(config.surface, pose, size)?,
        Command::Place {
            container,
            size,
            anchor,
            occupied,
            floating,
            count,
        } => commands::place(container, size, anchor, &occupied, floating, count)?,
        Command::RefreshDashboard { file } => commands::refresh_dashboard(&file)?,
        Command::AutoConnect { file } => commands::auto_connect(&file)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
