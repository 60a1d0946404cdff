use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Where log records end up for one run
#[derive(Debug, PartialEq, Eq)]
enum Sink<'a> {
    File(&'a Path),
    Stderr,
    Off,
}

/// The terminal belongs to the UI, so stderr is only used by `--print` runs.
fn sink(log_file: Option<&Path>, print: bool) -> Sink<'_> {
    match log_file {
        Some(path) => Sink::File(path),
        None if print => Sink::Stderr,
        None => Sink::Off,
    }
}

/// Route `log` output somewhere that cannot corrupt the terminal UI.
///
/// With a log file, records at `RUST_LOG` (default `info`) are appended to it.
/// In `--print` mode stderr receives what `RUST_LOG` enables. Otherwise
/// logging is off whatever `RUST_LOG` says.
pub fn init(log_file: Option<&Path>, print: bool) -> Result<()> {
    let mut builder = match sink(log_file, print) {
        Sink::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
            builder.target(Target::Pipe(Box::new(file)));
            builder
        }
        Sink::Stderr => {
            let mut builder = Builder::from_env(Env::default().default_filter_or("off"));
            builder.target(Target::Stderr);
            builder
        }
        Sink::Off => {
            let mut builder = Builder::new();
            builder.filter_level(LevelFilter::Off);
            builder
        }
    };
    builder.try_init().context("Failed to initialise logging")
}
