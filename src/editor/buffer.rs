use std::io::{self, BufRead};

use super::row::Row;

/// The rows of the open file plus the unsaved-changes flag. Indices are line
/// numbers; out-of-range indices are clamped or ignored, never a panic.
#[derive(Debug, Default)]
pub struct Buffer {
    rows: Vec<Row>,
    dirty: bool,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every line, trimming trailing `\n`/`\r` bytes. The result is clean.
    pub fn load<R: BufRead>(mut reader: R) -> io::Result<Self> {
        let mut buffer = Self::new();
        let mut line = Vec::new();
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            while let Some(b'\n' | b'\r') = line.last() {
                line.pop();
            }
            let at = buffer.len();
            buffer.insert_row(at, &line);
        }
        buffer.dirty = false;
        Ok(buffer)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    #[cfg(test)]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn insert_row(&mut self, at: usize, bytes: &[u8]) {
        let at = at.min(self.rows.len());
        self.rows.insert(at, Row::from_bytes(bytes));
        self.dirty = true;
    }

    pub fn delete_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            return;
        }
        self.rows.remove(at);
        self.dirty = true;
    }

    pub fn insert_char(&mut self, row: usize, at: usize, byte: u8) {
        if let Some(row) = self.rows.get_mut(row) {
            row.insert_byte(at, byte);
            self.dirty = true;
        }
    }

    pub fn delete_char(&mut self, row: usize, at: usize) {
        if let Some(row) = self.rows.get_mut(row) {
            if row.delete_byte(at) {
                self.dirty = true;
            }
        }
    }

    pub fn append_string(&mut self, row: usize, bytes: &[u8]) {
        if let Some(row) = self.rows.get_mut(row) {
            row.append_bytes(bytes);
            self.dirty = true;
        }
    }

    /// Truncates `row` at `at` and returns the cut-off tail.
    pub fn split_row(&mut self, row: usize, at: usize) -> Vec<u8> {
        match self.rows.get_mut(row) {
            Some(row) => {
                let tail = row.split_off(at);
                self.dirty = true;
                tail
            }
            None => Vec::new(),
        }
    }

    pub fn cx_to_rx(&self, row: usize, cx: usize) -> usize {
        self.rows.get(row).map_or(0, |row| row.cx_to_rx(cx))
    }

    /// Every row followed by `\n`.
    pub fn serialize(&self) -> Vec<u8> {
        let len = self.rows.iter().map(|row| row.len() + 1).sum();
        let mut bytes = Vec::with_capacity(len);
        for row in &self.rows {
            bytes.extend_from_slice(row.contents());
            bytes.push(b'\n');
        }
        bytes
    }
}
