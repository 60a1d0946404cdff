use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event as TermEvent},
    execute as crossterm_execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{backend::CrosstermBackend, widgets::Paragraph, Frame, Terminal};
use std::{borrow::Cow, io, path::{Path, PathBuf}};

use crate::browser::{Browser, Collaborators, Command, Event, Settings};
use crate::fs_ops::LocalFs;
use crate::keymap;
use crate::launcher::TerminalLauncher;
use crate::render;
use crate::snapshot::DirectorySnapshot;

/// How the interactive session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exit {
    Quit,
    ChangeDirectory(PathBuf),
}

pub fn run_tui(start: PathBuf, settings: Settings) -> Result<Exit> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm_execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = tui_main(&mut terminal, start, settings);

    // Restore terminal
    disable_raw_mode()?;
    crossterm_execute!(io::stdout(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    res
}

fn initial_load(start: &Path) -> Event {
    match DirectorySnapshot::load(&LocalFs, start) {
        Ok(snapshot) => Event::Loaded(snapshot),
        Err(err) => Event::Failed(err),
    }
}

fn tui_main(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    start: PathBuf,
    settings: Settings,
) -> Result<Exit> {
    let (width, height) = terminal::size().context("Failed to read terminal size")?;
    let mut launcher = TerminalLauncher;
    let mut env = Collaborators {
        fs: &LocalFs,
        launcher: &mut launcher,
    };

    let mut browser = Browser::new(&start, settings);
    for event in [
        Event::Resized {
            width: width.into(),
            height: height.into(),
        },
        initial_load(&start),
    ] {
        browser = browser.update(event, &mut env).0;
    }

    loop {
        terminal.draw(|f| draw(f, &browser))?;

        // One event is handled completely, render included, before the next is read
        let event = match event::read()? {
            TermEvent::Key(key) => match keymap::translate(&key) {
                Some(key) => Event::KeyPressed(key),
                None => continue,
            },
            TermEvent::Resize(width, height) => Event::Resized {
                width: width.into(),
                height: height.into(),
            },
            _ => continue,
        };

        let (next, command) = browser.update(event, &mut env);
        browser = next;
        match command {
            Command::None => {}
            Command::Redraw => terminal.clear()?,
            Command::Quit => return Ok(Exit::Quit),
            Command::ChangeDirectory(path) => {
                info!("leaving for {}", path.display());
                return Ok(Exit::ChangeDirectory(path));
            }
        }
    }
}

fn draw(f: &mut Frame, browser: &Browser) {
    f.render_widget(Paragraph::new(render::render(browser)), f.size());
}

/// Render the first frame of `start` as plain text, without a terminal.
pub fn render_once(start: &Path, settings: Settings, width: usize, height: usize) -> String {
    let mut launcher = TerminalLauncher;
    let mut env = Collaborators {
        fs: &LocalFs,
        launcher: &mut launcher,
    };
    let mut browser = Browser::new(start, settings);
    for event in [Event::Resized { width, height }, initial_load(start)] {
        browser = browser.update(event, &mut env).0;
    }
    render::plain_text(&render::render(&browser))
}

/// Shell command that moves the enclosing shell to `path`.
///
/// Built from the raw path bytes so names that are not valid UTF-8 survive.
pub fn cd_command(path: &Path) -> Vec<u8> {
    let raw = path_bytes(path);
    let safe = |b: &u8| b.is_ascii_alphanumeric() || b"/._-+,:@%=~".contains(b);
    let mut out = b"cd ".to_vec();
    if !raw.is_empty() && raw.iter().all(safe) {
        out.extend_from_slice(&raw);
    } else {
        out.push(b'\'');
        for &b in raw.iter() {
            if b == b'\'' {
                out.extend_from_slice(br"'\''");
            } else {
                out.push(b);
            }
        }
        out.push(b'\'');
    }
    out
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    Cow::Owned(path.to_string_lossy().into_owned().into_bytes())
}
