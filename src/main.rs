#![cfg_attr(not(test), deny(dead_code))]

mod editor;
mod logging;
mod terminal;
mod util;

use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use crate::editor::Editor;
use crate::terminal::RawMode;

/// A small terminal text editor.
#[derive(Parser, Debug)]
#[command(name = "kilo", disable_help_flag = true, disable_version_flag = true)]
struct Args {
    /// File to open. Created on first save if it does not exist.
    file: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();
    if let Err(err) = logging::init() {
        eprintln!("kilo: logging disabled: {}", err);
    }

    if let Err(err) = run(&args) {
        // Raw mode is already gone by the time `run` returns.
        let _ = terminal::clear_screen(&mut io::stdout());
        error!(error = ?err, "fatal");
        eprintln!("{:#}", err);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let raw_mode = RawMode::enable().context("failed to enable raw mode")?;
    let (rows, cols) =
        terminal::window_size(&mut io::stdin(), &mut io::stdout()).context("failed to get window size")?;
    info!(rows, cols, "starting");

    let mut editor = Editor::new(io::stdin(), io::stdout(), rows, cols);
    if let Some(path) = &args.file {
        editor
            .open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
    }
    editor.set_status_message("HELP: Ctrl-S = save | Ctrl-Q = quit");

    editor.run().context("editor loop failed")?;
    raw_mode.restore().context("failed to restore terminal")?;
    Ok(())
}
