use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::fs;
use std::io::{self, Write};

mod browser;
mod cli;
mod error;
mod fs_ops;
mod grid;
mod keymap;
mod launcher;
mod logging;
mod render;
mod search;
mod snapshot;
mod tui;
mod viewport;

use cli::Args;
use tui::Exit;

fn main() -> Result<()> {
    let args = Args::parse();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    logging::init(args.log_file.as_deref(), args.print)?;
    let start = args
        .start_dir()
        .context("Failed to resolve the starting directory")?;
    info!("starting in {}", start.display());

    if args.print {
        let frame = tui::render_once(
            &start,
            args.settings(),
            args.width.into(),
            args.height.into(),
        );
        print!("{frame}");
        return Ok(());
    }

    match tui::run_tui(start, args.settings())? {
        Exit::Quit => {}
        Exit::ChangeDirectory(path) => {
            let mut command = tui::cd_command(&path);
            command.push(b'\n');
            // Hand the command to the enclosing shell wrapper
            match &args.cd_file {
                Some(cd_file) => fs::write(cd_file, &command)
                    .with_context(|| format!("Failed to write to file: {}", cd_file.display()))?,
                None => io::stdout()
                    .write_all(&command)
                    .context("Failed to write the cd command")?,
            }
        }
    }
    Ok(())
}
