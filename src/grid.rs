/// Character budget for one grid cell, separator included
pub const COLUMN_WIDTH: usize = 50;

/// Number of columns that fit in `width` cells, never less than one
pub fn column_count(width: usize) -> usize {
    (width / COLUMN_WIDTH).max(1)
}

/// Grid row holding the entry at `index`
pub fn row_of(index: usize, columns: usize) -> usize {
    index / columns.max(1)
}

/// Position of the entry at `index` inside its row
pub fn position_in_row(index: usize, columns: usize) -> usize {
    index % columns.max(1)
}
