//! Plateau - desktop panel simulator
//!
//! Runs the same UI logic as the firmware against a terminal
//! rendering of the 2x16 LCD and keypad. Settings live in a JSON
//! file so a plate inventory can be set up by hand, inspected, and
//! carried between runs.

use std::env;
use std::io;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::{debug, info};

use plateau_core::menu::MenuTree;
use plateau_core::state;
use plateau_core::traits::ConfigStore;

use crate::panel::TermPanel;
use crate::store::JsonStore;

mod panel;
mod store;

#[derive(Parser)]
#[command(
    name = "plateau-sim",
    version,
    about = "Terminal simulator for the Plateau plate calculator"
)]
struct Cli {
    /// Path to the JSON settings file (default: next to the executable)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(long)]
    trace: bool,
}

/// The firmware keeps settings in flash; the simulator keeps them in
/// a file next to its own binary unless told otherwise.
fn default_config_path() -> PathBuf {
    env::current_exe()
        .ok()
        .map(|exe| exe.with_file_name("plateau-settings.json"))
        .unwrap_or_else(|| PathBuf::from("plateau-settings.json"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.trace {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let path = cli.config.unwrap_or_else(default_config_path);
    let mut store = JsonStore::open(&path)?;
    let mut panel = TermPanel::new()?;

    info!("panel ready");
    loop {
        // A fresh tree per cycle, like the firmware rebuilding its
        // state after the wake-up reset.
        let mut tree = MenuTree::build(store.weights());
        state::run(&mut panel, &mut store, &mut tree)
            .map_err(|e| anyhow!("ui loop failed: {:?}", e))?;
        debug!("sleep cycle complete, restarting UI");
    }
}
