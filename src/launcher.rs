use std::io;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

use crossterm::{
    event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, warn};

/// An external program plus the leading arguments configured with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub name: String,
    pub args: Vec<String>,
}

impl Program {
    /// Split a configured command like `code --wait` into program and arguments,
    /// honouring shell quoting.
    ///
    /// Blank or unbalanced input falls back to `default`.
    pub fn parse(command: &str, default: &str) -> Self {
        let fallback = || Self {
            name: default.to_string(),
            args: Vec::new(),
        };
        let trimmed = command.trim();
        if trimmed.is_empty() {
            return fallback();
        }
        match shell_words::split(trimmed) {
            Ok(mut parts) if !parts.is_empty() => {
                let name = parts.remove(0);
                Self { name, args: parts }
            }
            Ok(_) => fallback(),
            Err(e) => {
                warn!("cannot parse {command:?} ({e}), using {default}");
                fallback()
            }
        }
    }
}

/// Runs interactive programs that take over the terminal until they exit.
pub trait Launcher {
    fn spawn_interactive(&mut self, program: &Program, target: &Path) -> io::Result<()>;
}

/// Hands the real terminal to the child and takes it back afterwards.
#[derive(Debug, Default)]
pub struct TerminalLauncher;

impl Launcher for TerminalLauncher {
    fn spawn_interactive(&mut self, program: &Program, target: &Path) -> io::Result<()> {
        let mut stdout = io::stdout();
        disable_raw_mode()?;
        execute!(stdout, LeaveAlternateScreen)?;

        info!("running {} {:?} {}", program.name, program.args, target.display());
        let status = Command::new(&program.name)
            .args(&program.args)
            .arg(target)
            .status();

        execute!(stdout, EnterAlternateScreen)?;
        enable_raw_mode()?;
        // keystrokes typed into the child must not reach the browser
        while event::poll(Duration::from_millis(0))? {
            let _ = event::read();
        }

        let status = status?;
        if !status.success() {
            warn!("{} exited with {}", program.name, status);
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{} exited with {}", program.name, status),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
pub mod recording {
    use std::io;
    use std::path::{Path, PathBuf};

    use super::{Launcher, Program};

    /// Remembers every launch instead of running anything.
    #[derive(Debug, Default)]
    pub struct RecordingLauncher {
        pub launched: Vec<(String, PathBuf)>,
        pub fail: bool,
    }

    impl Launcher for RecordingLauncher {
        fn spawn_interactive(&mut self, program: &Program, target: &Path) -> io::Result<()> {
            self.launched.push((program.name.clone(), target.to_path_buf()));
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::NotFound, "program not found"));
            }
            Ok(())
        }
    }
}
