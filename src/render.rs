use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::browser::{Browser, Mode};
use crate::fs_ops::{DirectoryEntry, MODE_PLACEHOLDER};
use crate::grid;
use crate::keymap;

/// Widest name, in terminal columns, shown untruncated
const NAME_BUDGET: usize = 29;
const NAME_FIELD: usize = 30;
const COLUMN_SEPARATOR: &str = " | ";

pub const EMPTY_LISTING: &str = "No items to display in this directory...";

/// Project the browser state onto one frame of text.
pub fn render(browser: &Browser) -> Text<'static> {
    let mut lines = grid_lines(browser);

    lines.push(match browser.error() {
        Some(err) => Line::from(Span::styled(
            format!("Error: {err}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        None => Line::from(""),
    });

    let mut path_line = format!("Current Directory: {}", browser.snapshot().path().display());
    if browser.mode() == Mode::Search {
        path_line.push_str(" | Press 'esc' to exit search mode");
    }
    lines.push(Line::from(Span::styled(
        path_line,
        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
    )));

    lines.push(footer(browser));
    Text::from(lines)
}

fn grid_lines(browser: &Browser) -> Vec<Line<'static>> {
    let snapshot = browser.snapshot();
    let total = snapshot.filtered_len();
    if total == 0 {
        return vec![Line::from(EMPTY_LISTING)];
    }

    let viewport = browser.viewport();
    let columns = viewport.column_count();
    let row_count = grid::row_of(total - 1, columns) + 1;

    let mut lines = Vec::new();
    for row in (0..row_count).filter(|&row| viewport.is_row_visible(row)) {
        let start = row * columns;
        let end = (start + columns).min(total);
        let mut spans = Vec::with_capacity((end - start) * 3);
        for index in start..end {
            if grid::position_in_row(index, columns) > 0 {
                spans.push(Span::raw(COLUMN_SEPARATOR));
            }
            if let Some(entry) = snapshot.get(index) {
                spans.extend(cell(entry, index == browser.cursor()));
            }
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn cell(entry: &DirectoryEntry, selected: bool) -> [Span<'static>; 2] {
    let marker = if selected { ">" } else { " " };
    let mode = entry.mode.as_deref().unwrap_or(MODE_PLACEHOLDER);
    let mut style = Style::default().fg(entry_color(entry));
    if selected {
        style = style.add_modifier(Modifier::BOLD);
    }
    let name = display_name(entry);
    let pad = NAME_FIELD.saturating_sub(name.width());
    [
        Span::raw(marker),
        Span::styled(format!(" {name}{:pad$} {mode}", ""), style),
    ]
}

fn entry_color(entry: &DirectoryEntry) -> Color {
    if entry.is_dir {
        Color::Blue
    } else if entry.is_symlink_dir {
        Color::Magenta
    } else {
        Color::Cyan
    }
}

/// Name cut to the column budget with an ellipsis; directories get a trailing `/`.
pub fn display_name(entry: &DirectoryEntry) -> String {
    let mut name = if entry.name.width() > NAME_BUDGET {
        let mut cut = String::new();
        let mut used = 0;
        for c in entry.name.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > NAME_BUDGET - 1 {
                break;
            }
            used += w;
            cut.push(c);
        }
        cut.push('…');
        cut
    } else {
        entry.name.clone()
    };
    if entry.is_navigable() {
        name.push('/');
    }
    name
}

fn footer(browser: &Browser) -> Line<'static> {
    match browser.mode() {
        Mode::RemoveConfirm => {
            let name = browser
                .snapshot()
                .get(browser.cursor())
                .map_or_else(|| "file".to_string(), |e| e.name.clone());
            Line::from(Span::styled(
                format!("Remove {name}? (y/n): "),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ))
        }
        Mode::Search => Line::from(format!("Search: {}", browser.search())),
        Mode::Normal if !browser.search().is_empty() => {
            Line::from(format!("Search: {}", browser.search()))
        }
        Mode::Normal => help_line(),
    }
}

fn help_line() -> Line<'static> {
    let mut spans = Vec::new();
    for (i, (key, desc)) in keymap::HELP.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            *key,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(": "));
        spans.push(Span::styled(*desc, Style::default().fg(Color::Green)));
    }
    Line::from(spans)
}

/// Frame text without styling, one line per row.
pub fn plain_text(text: &Text<'_>) -> String {
    let mut out = String::new();
    for line in &text.lines {
        for span in &line.spans {
            out.push_str(&span.content);
        }
        out.push('\n');
    }
    out
}
