//! The browser state machine.
//!
//! [`Browser::update`] consumes the current state and one [`Event`] and
//! returns the next state plus a [`Command`] for the terminal driver. Which
//! handler interprets a key depends only on the active [`Mode`]; filesystem
//! access and interactive programs go through the [`Collaborators`] passed
//! in, so the whole machine runs without a terminal.

use std::path::PathBuf;

use log::{debug, info, warn};

use crate::error::BrowseError;
use crate::fs_ops::Filesystem;
use crate::keymap::{self, Action, Key};
use crate::launcher::{Launcher, Program};
use crate::search;
use crate::snapshot::{BackStack, DirectorySnapshot, NavigationFrame};
use crate::viewport::Viewport;

/// Which interpretation of keys is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    Search,
    RemoveConfirm,
}

#[derive(Debug)]
pub enum Event {
    Loaded(DirectorySnapshot),
    Failed(BrowseError),
    Resized { width: usize, height: usize },
    KeyPressed(Key),
}

/// What the driver must do after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    None,
    /// An interactive program had the terminal; repaint everything
    Redraw,
    Quit,
    ChangeDirectory(PathBuf),
}

/// Programs used for the edit and view actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub editor: Program,
    pub pager: Program,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            editor: Program::parse("vi", "vi"),
            pager: Program::parse("less", "less"),
        }
    }
}

pub struct Collaborators<'a> {
    pub fs: &'a dyn Filesystem,
    pub launcher: &'a mut dyn Launcher,
}

#[derive(Debug, Clone, Copy)]
enum Opener {
    Editor,
    Pager,
}

impl Opener {
    fn label(self) -> &'static str {
        match self {
            Opener::Editor => "editor",
            Opener::Pager => "pager",
        }
    }
}

#[derive(Debug)]
pub struct Browser {
    snapshot: DirectorySnapshot,
    cursor: usize,
    viewport: Viewport,
    mode: Mode,
    search: String,
    back_stack: BackStack,
    error: Option<BrowseError>,
    settings: Settings,
}

impl Browser {
    /// A browser with nothing loaded yet; feed it `Resized` and `Loaded`.
    pub fn new(start: impl Into<PathBuf>, settings: Settings) -> Self {
        Self {
            snapshot: DirectorySnapshot::empty(start),
            cursor: 0,
            viewport: Viewport::new(0, 0),
            mode: Mode::Normal,
            search: String::new(),
            back_stack: BackStack::default(),
            error: None,
            settings,
        }
    }

    pub fn snapshot(&self) -> &DirectorySnapshot {
        &self.snapshot
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn error(&self) -> Option<&BrowseError> {
        self.error.as_ref()
    }

    pub fn update(mut self, event: Event, env: &mut Collaborators<'_>) -> (Self, Command) {
        match event {
            Event::Loaded(snapshot) => {
                self.error = None;
                self.replace_snapshot(snapshot);
                self.viewport.follow(self.cursor);
                (self, Command::None)
            }
            Event::Failed(err) => {
                self.fail(err);
                (self, Command::None)
            }
            Event::Resized { width, height } => {
                self.viewport.resize(width, height);
                self.viewport.follow(self.cursor);
                (self, Command::None)
            }
            Event::KeyPressed(key) => {
                self.error = None;
                let mode = self.mode;
                let (mut next, command) = match mode {
                    Mode::Normal => self.handle_normal(key, env),
                    Mode::Search => self.handle_search(key),
                    Mode::RemoveConfirm => self.handle_remove_confirm(key, env.fs),
                };
                next.viewport.follow(next.cursor);
                (next, command)
            }
        }
    }

    fn handle_normal(mut self, key: Key, env: &mut Collaborators<'_>) -> (Self, Command) {
        let Some(action) = keymap::normal_action(key) else {
            return (self, Command::None);
        };
        let columns = self.viewport.column_count();
        let last = self.snapshot.filtered_len().checked_sub(1);
        match action {
            Action::Quit => return (self, Command::Quit),
            Action::ChangeDirectory => {
                let path = self.snapshot.path().to_path_buf();
                return (self, Command::ChangeDirectory(path));
            }
            Action::MoveUp => {
                if self.cursor >= columns {
                    self.cursor -= columns;
                }
            }
            Action::MoveDown => {
                if let Some(last) = last.filter(|&last| self.cursor < last) {
                    self.cursor = (self.cursor + columns).min(last);
                }
            }
            Action::MoveLeft => self.cursor = self.cursor.saturating_sub(1),
            Action::MoveRight => {
                if last.map_or(false, |last| self.cursor < last) {
                    self.cursor += 1;
                }
            }
            Action::Ascend => self.ascend(env.fs),
            Action::Descend => self.descend(env.fs),
            Action::Search => self.mode = Mode::Search,
            Action::Remove => self.mode = Mode::RemoveConfirm,
            Action::Edit => return self.open_current(Opener::Editor, env.launcher),
            Action::View => return self.open_current(Opener::Pager, env.launcher),
        }
        (self, Command::None)
    }

    fn handle_search(mut self, key: Key) -> (Self, Command) {
        match key {
            Key::Interrupt => return (self, Command::Quit),
            Key::Escape | Key::Enter => self.mode = Mode::Normal,
            Key::Backspace => {
                self.search.pop();
                self.refilter();
            }
            Key::Char(c) if search::is_search_char(c) => {
                self.search.push(c);
                self.refilter();
            }
            _ => {}
        }
        (self, Command::None)
    }

    fn handle_remove_confirm(mut self, key: Key, fs: &dyn Filesystem) -> (Self, Command) {
        self.mode = Mode::Normal;
        match key {
            Key::Interrupt => return (self, Command::Quit),
            Key::Char('y') => match self.snapshot.remove_entry(fs, self.cursor) {
                Ok(Some(mut snapshot)) => {
                    snapshot.apply_filter(&self.search);
                    self.snapshot = snapshot;
                    self.clamp_cursor();
                }
                Ok(None) => {}
                Err(err) => self.fail(err),
            },
            _ => debug!("removal cancelled"),
        }
        (self, Command::None)
    }

    fn descend(&mut self, fs: &dyn Filesystem) {
        let Some(entry) = self.snapshot.get(self.cursor) else {
            return;
        };
        if !entry.is_navigable() {
            return;
        }
        match self.snapshot.descend(fs, &entry.file_name) {
            Ok(snapshot) => {
                self.back_stack.push(NavigationFrame {
                    cursor: self.cursor,
                    min_row: self.viewport.min_row,
                });
                info!(
                    "entered {} (depth {})",
                    snapshot.path().display(),
                    self.back_stack.depth()
                );
                self.replace_snapshot(snapshot);
            }
            Err(err) => self.fail(err),
        }
    }

    fn ascend(&mut self, fs: &dyn Filesystem) {
        let Some(result) = self.snapshot.ascend(fs) else {
            return;
        };
        match result {
            Ok(snapshot) => {
                info!("back to {}", snapshot.path().display());
                self.replace_snapshot(snapshot);
                if let Some(frame) = self.back_stack.pop() {
                    self.cursor = frame.cursor;
                    self.viewport.min_row = frame.min_row;
                    self.clamp_cursor();
                }
            }
            Err(err) => self.fail(err),
        }
    }

    fn open_current(mut self, opener: Opener, launcher: &mut dyn Launcher) -> (Self, Command) {
        let Some(entry) = self.snapshot.get(self.cursor) else {
            return (self, Command::None);
        };
        if entry.is_navigable() {
            let err = BrowseError::Action(format!("cannot open file {}", entry.name));
            self.fail(err);
            return (self, Command::None);
        }
        let target = self.snapshot.path().join(&entry.file_name);
        let program = match opener {
            Opener::Editor => &self.settings.editor,
            Opener::Pager => &self.settings.pager,
        };
        if let Err(e) = launcher.spawn_interactive(program, &target) {
            let err = BrowseError::Action(format!("error opening {}: {e}", opener.label()));
            self.fail(err);
        }
        (self, Command::Redraw)
    }

    /// Swap in a freshly read directory, dropping the search.
    fn replace_snapshot(&mut self, snapshot: DirectorySnapshot) {
        self.snapshot = snapshot;
        self.search.clear();
        self.cursor = 0;
    }

    fn refilter(&mut self) {
        self.snapshot.apply_filter(&self.search);
        self.cursor = 0;
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self
            .cursor
            .min(self.snapshot.filtered_len().saturating_sub(1));
    }

    fn fail(&mut self, err: BrowseError) {
        warn!("{err}");
        self.error = Some(err);
    }
}
