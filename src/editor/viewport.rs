use super::buffer::Buffer;
use super::cursor::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub row_offset: usize,
    pub col_offset: usize,
    pub screen_rows: usize,
    pub screen_cols: usize,
}

impl Viewport {
    pub fn new(screen_rows: usize, screen_cols: usize) -> Self {
        Viewport {
            row_offset: 0,
            col_offset: 0,
            screen_rows,
            screen_cols,
        }
    }

    /// Recomputes the cursor's rendered column and scrolls just enough to
    /// bring the cursor into view.
    pub fn reconcile(&mut self, cursor: &mut Cursor, buffer: &Buffer) {
        cursor.rx = buffer.cx_to_rx(cursor.cy, cursor.cx);
        self.scroll(cursor.cy, cursor.rx);
    }

    fn scroll(&mut self, cy: usize, rx: usize) {
        if cy < self.row_offset {
            self.row_offset = cy;
        }
        if cy >= self.row_offset + self.screen_rows {
            self.row_offset = (cy + 1).saturating_sub(self.screen_rows);
        }
        if rx < self.col_offset {
            self.col_offset = rx;
        }
        if rx >= self.col_offset + self.screen_cols {
            self.col_offset = (rx + 1).saturating_sub(self.screen_cols);
        }
    }
}
