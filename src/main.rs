// SPDX-License-Identifier: MIT
//
// vt-dash — a fixed-layout VT100 battery monitor.
//
// Wires the vt-term pieces together:
//
//   stdin → StdinSource → Decoder → Dashboard::on_key / on_diagnostic
//   Dashboard::paint → Renderer → BufWriter<Stdout>
//
// Raw mode is held for the whole run and dropped only after the render
// session has ended, so the farewell line prints on a cooked terminal.
// Logs go to a file (never stdout, which is the dashboard) and only when
// one is configured.

mod cells;
mod config;
mod dashboard;

use std::fs::OpenOptions;
use std::io::{self, BufWriter};
use std::path::Path;
use std::process;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use vt_term::event_loop::{EventLoop, Exit};
use vt_term::reader::StdinSource;
use vt_term::render::Renderer;
use vt_term::terminal::RawMode;

use crate::cells::CellBank;
use crate::config::{Command, Config, USAGE};
use crate::dashboard::Dashboard;

fn main() {
    let config = match Config::from_env() {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            println!("{USAGE}");
            return;
        }
        Err(e) => {
            eprintln!("vt-dash: {e}");
            eprintln!("Try 'vt-dash --help' for more information.");
            process::exit(1);
        }
    };

    if let Some(path) = &config.log {
        if let Err(e) = init_logging(path) {
            eprintln!("vt-dash: cannot log to {}: {e}", path.display());
            process::exit(1);
        }
    }

    match run(&config) {
        Ok(Exit::Quit) => println!("CTRL + C, Bye!"),
        Ok(Exit::EndOfInput) => {}
        Err(e) => {
            tracing::error!(%e, "dashboard failed");
            eprintln!("vt-dash: {e}");
            process::exit(1);
        }
    }
}

fn run(config: &Config) -> io::Result<Exit> {
    let _raw = RawMode::enable()?;

    let mut app = Dashboard::new(CellBank::new(config.cells, config.seed));
    let renderer = Renderer::with_default_style(BufWriter::new(io::stdout()), config.style);
    let mut event_loop = EventLoop::new(StdinSource::new(config.poll));

    tracing::info!(?config, "starting dashboard");
    event_loop.run(&mut app, renderer)
}

/// Append plain-text logs to `path`, filtered by `RUST_LOG` (default
/// `info`).
fn init_logging(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(io::Error::other)
}
