use std::ops::RangeInclusive;

use crate::grid;

/// Lines always reserved below the grid for the error, path and footer text.
pub const FIXED_OVERHEAD_ROWS: usize = 5;

/// Last known terminal geometry plus the first grid row being shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
    pub min_row: usize,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            min_row: 0,
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    pub fn column_count(&self) -> usize {
        grid::column_count(self.width)
    }

    /// Scroll at most one row towards the cursor's row.
    pub fn follow(&mut self, cursor: usize) {
        self.min_row = recompute(self.height, self.column_count(), cursor, self.min_row);
    }

    /// Grid rows eligible for rendering, `None` when the terminal is too short for any.
    pub fn visible_rows(&self) -> Option<RangeInclusive<usize>> {
        let max = max_visible_row(self.min_row, self.height)?;
        if max < self.min_row {
            return None;
        }
        Some(self.min_row..=max)
    }

    pub fn is_row_visible(&self, row: usize) -> bool {
        self.visible_rows().map_or(false, |rows| rows.contains(&row))
    }
}

fn max_visible_row(min_row: usize, height: usize) -> Option<usize> {
    (min_row + height).checked_sub(FIXED_OVERHEAD_ROWS)
}

/// Next `min_row` for a cursor at `cursor`, moving by at most one row.
///
/// Large cursor jumps (a directory change, a filter reset) are caught up one
/// row per call rather than recentred.
pub fn recompute(height: usize, columns: usize, cursor: usize, previous_min_row: usize) -> usize {
    let cursor_row = grid::row_of(cursor, columns);
    if cursor_row < previous_min_row {
        return previous_min_row - 1;
    }
    if height < FIXED_OVERHEAD_ROWS {
        return previous_min_row;
    }
    match max_visible_row(previous_min_row, height) {
        Some(max) if cursor_row > max => previous_min_row + 1,
        _ => previous_min_row,
    }
}
