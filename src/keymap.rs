use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Key symbols the browser understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
    Backspace,
    /// ctrl+c, quits from every mode
    Interrupt,
    Char(char),
}

/// What a key means in normal mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Ascend,
    Search,
    Remove,
    Edit,
    View,
    Descend,
    ChangeDirectory,
}

pub const HELP: &[(&str, &str)] = &[
    ("←↑↓→", "Move"),
    ("Enter", "Open dir"),
    ("b", "Up dir"),
    ("/", "Search"),
    ("e", "Edit"),
    ("v", "View"),
    ("d", "Remove"),
    ("c", "cd & quit"),
    ("q", "Quit"),
];

pub fn normal_action(key: Key) -> Option<Action> {
    let action = match key {
        Key::Up => Action::MoveUp,
        Key::Down => Action::MoveDown,
        Key::Left => Action::MoveLeft,
        Key::Right => Action::MoveRight,
        Key::Enter => Action::Descend,
        Key::Interrupt | Key::Char('q') => Action::Quit,
        Key::Char('b') => Action::Ascend,
        Key::Char('/') => Action::Search,
        Key::Char('d') => Action::Remove,
        Key::Char('e') => Action::Edit,
        Key::Char('v') => Action::View,
        Key::Char('c') => Action::ChangeDirectory,
        _ => return None,
    };
    Some(action)
}

/// Translate a terminal key event; releases and unbound chords yield `None`.
pub fn translate(event: &KeyEvent) -> Option<Key> {
    if event.kind != KeyEventKind::Press {
        return None;
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c') => Some(Key::Interrupt),
            _ => None,
        };
    }
    let key = match event.code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Char(c) => Key::Char(c),
        _ => return None,
    };
    Some(key)
}
