use std::path::PathBuf;

use clap::Parser;

use crate::browser::Settings;
use crate::launcher::Program;

pub const DEFAULT_EDITOR: &str = "vi";
pub const DEFAULT_PAGER: &str = "less";

#[derive(Parser, Debug)]
#[command(
    name = "t-walker",
    about = "Browse directories in a terminal grid, search live, open files, and cd on exit",
    version,
    long_about = "t-walker shows a directory as a multi-column grid. Arrow keys move, Enter descends, 'b' goes back up, '/' searches, 'e'/'v' open the selected file in your editor or pager, 'd' deletes after confirmation, and 'c' quits leaving a `cd` command for your shell."
)]
pub struct Args {
    #[arg(help = "Directory to start in (defaults to the current directory)")]
    pub dir: Option<PathBuf>,

    #[arg(long, env = "EDITOR", default_value = DEFAULT_EDITOR, help = "Editor used by 'e'")]
    pub editor: String,

    #[arg(long, env = "PAGER", default_value = DEFAULT_PAGER, help = "Pager used by 'v'")]
    pub pager: String,

    #[arg(long, value_name = "PATH", help = "Write the exit `cd` command to this file instead of stdout")]
    pub cd_file: Option<PathBuf>,

    #[arg(long, value_name = "PATH", help = "Append logs to this file (level from RUST_LOG)")]
    pub log_file: Option<PathBuf>,

    #[arg(short, long, help = "Print one frame of the listing as plain text and exit")]
    pub print: bool,

    #[arg(long, default_value_t = 100, requires = "print", help = "Frame width for --print")]
    pub width: u16,

    #[arg(long, default_value_t = 24, requires = "print", help = "Frame height for --print")]
    pub height: u16,
}

impl Args {
    /// Validate the starting directory before the terminal is touched
    pub fn validate(&self) -> Result<(), String> {
        if let Some(dir) = &self.dir {
            if !dir.exists() {
                return Err(format!("Directory does not exist: {}", dir.display()));
            }
            if !dir.is_dir() {
                return Err(format!("Not a directory: {}", dir.display()));
            }
        }
        if let Some(cd_file) = &self.cd_file {
            if cd_file.is_dir() {
                return Err(format!("--cd-file points at a directory: {}", cd_file.display()));
            }
        }
        Ok(())
    }

    /// Absolute starting directory
    pub fn start_dir(&self) -> std::io::Result<PathBuf> {
        match &self.dir {
            Some(dir) => dir.canonicalize(),
            None => std::env::current_dir(),
        }
    }

    pub fn settings(&self) -> Settings {
        Settings {
            editor: Program::parse(&self.editor, DEFAULT_EDITOR),
            pager: Program::parse(&self.pager, DEFAULT_PAGER),
        }
    }
}
