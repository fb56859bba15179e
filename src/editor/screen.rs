use std::io::Write;

use super::buffer::Buffer;
use super::cursor::Cursor;
use super::viewport::Viewport;
use crate::util;

const KILO_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything one refresh needs. `compose` turns it into a single blob of
/// bytes so the terminal sees the whole frame in one write.
pub struct Frame<'a> {
    pub buffer: &'a Buffer,
    pub viewport: &'a Viewport,
    pub cursor: &'a Cursor,
    pub filename: Option<&'a [u8]>,
    pub message: Option<&'a str>,
}

impl Frame<'_> {
    pub fn compose(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"\x1b[?25l");
        out.extend_from_slice(b"\x1b[H");
        self.draw_rows(&mut out);
        self.draw_status_bar(&mut out);
        self.draw_message_bar(&mut out);

        let cursor_y = self.cursor.cy.saturating_sub(self.viewport.row_offset) + 1;
        let cursor_x = self.cursor.rx.saturating_sub(self.viewport.col_offset) + 1;
        let _ = write!(out, "\x1b[{};{}H", cursor_y, cursor_x);
        out.extend_from_slice(b"\x1b[?25h");
        out
    }

    fn draw_rows(&self, out: &mut Vec<u8>) {
        let screen_cols = self.viewport.screen_cols;
        for y in 0..self.viewport.screen_rows {
            let file_row = y + self.viewport.row_offset;
            match self.buffer.row(file_row) {
                Some(row) => {
                    out.extend_from_slice(util::window(row.render(), self.viewport.col_offset, screen_cols));
                }
                None if self.buffer.is_empty() && y == self.viewport.screen_rows / 3 => {
                    let welcome = format!("Kilo editor -- version {}", KILO_VERSION);
                    let welcome = util::truncate(welcome.as_bytes(), screen_cols);
                    let mut padding = (screen_cols - welcome.len()) / 2;
                    if padding > 0 {
                        out.push(b'~');
                        padding -= 1;
                    }
                    out.resize(out.len() + padding, b' ');
                    out.extend_from_slice(welcome);
                }
                None => out.push(b'~'),
            }

            out.extend_from_slice(b"\x1b[K");
            out.extend_from_slice(b"\r\n");
        }
    }

    fn draw_status_bar(&self, out: &mut Vec<u8>) {
        let screen_cols = self.viewport.screen_cols;
        out.extend_from_slice(b"\x1b[7m");

        let mut status = match self.filename {
            Some(name) => util::truncate(name, 20).to_vec(),
            None => b"[No Name]".to_vec(),
        };
        let modified = if self.buffer.is_dirty() { "(modified)" } else { "" };
        let _ = write!(status, " - {} lines {}", self.buffer.len(), modified);
        let rstatus = format!("{}/{}", self.cursor.cy + 1, self.buffer.len());

        let status = util::truncate(&status, screen_cols);
        out.extend_from_slice(status);
        // The right-hand side only appears if it fits flush against the edge.
        let mut len = status.len();
        while len < screen_cols {
            if screen_cols - len == rstatus.len() {
                out.extend_from_slice(rstatus.as_bytes());
                break;
            }
            out.push(b' ');
            len += 1;
        }

        out.extend_from_slice(b"\x1b[m");
        out.extend_from_slice(b"\r\n");
    }

    fn draw_message_bar(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(b"\x1b[K");
        if let Some(message) = self.message {
            out.extend_from_slice(util::truncate(message.as_bytes(), self.viewport.screen_cols));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_of(lines: &[&str]) -> Buffer {
        let mut buffer = Buffer::new();
        for line in lines {
            let at = buffer.len();
            buffer.insert_row(at, line.as_bytes());
        }
        buffer.mark_clean();
        buffer
    }

    fn text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    /// The lines of a frame with the leading hide/home prefix removed.
    fn lines(frame: &[u8]) -> Vec<String> {
        let body = text(frame);
        let body = body.strip_prefix("\x1b[?25l\x1b[H").unwrap().to_string();
        body.split("\r\n").map(str::to_string).collect()
    }

    #[test]
    fn frame_is_bracketed_by_cursor_visibility() {
        let buffer = buffer_of(&["hello"]);
        let viewport = Viewport::new(3, 20);
        let cursor = Cursor::new();
        let frame = Frame { buffer: &buffer, viewport: &viewport, cursor: &cursor, filename: None, message: None }.compose();
        assert!(frame.starts_with(b"\x1b[?25l\x1b[H"));
        assert!(frame.ends_with(b"\x1b[1;1H\x1b[?25h"));
    }

    #[test]
    fn rows_are_windowed_and_padded_with_tildes() {
        let buffer = buffer_of(&["0123456789", "\tx"]);
        let mut viewport = Viewport::new(4, 5);
        viewport.col_offset = 3;
        let cursor = Cursor::new();
        let frame = Frame { buffer: &buffer, viewport: &viewport, cursor: &cursor, filename: None, message: None }.compose();
        let lines = lines(&frame);
        assert_eq!(lines[0], "34567\x1b[K");
        assert_eq!(lines[1], "     \x1b[K");
        assert_eq!(lines[2], "~\x1b[K");
        assert_eq!(lines[3], "~\x1b[K");
    }

    #[test]
    fn scrolled_past_short_row_emits_nothing() {
        let buffer = buffer_of(&["ab"]);
        let mut viewport = Viewport::new(1, 5);
        viewport.col_offset = 10;
        let cursor = Cursor::new();
        let frame = Frame { buffer: &buffer, viewport: &viewport, cursor: &cursor, filename: None, message: None }.compose();
        assert_eq!(lines(&frame)[0], "\x1b[K");
    }

    #[test]
    fn welcome_banner_only_for_empty_buffer() {
        let empty = Buffer::new();
        let viewport = Viewport::new(9, 40);
        let cursor = Cursor::new();
        let frame = Frame { buffer: &empty, viewport: &viewport, cursor: &cursor, filename: None, message: None }.compose();
        let banner = format!("Kilo editor -- version {}", KILO_VERSION);
        let lines = lines(&frame);
        assert!(lines[3].starts_with('~'));
        assert!(lines[3].contains(&banner));
        assert_eq!(lines[3].len(), 1 + (40 - banner.len()) / 2 - 1 + banner.len() + 3);
        assert_eq!(lines[2], "~\x1b[K");

        let buffer = buffer_of(&["x"]);
        let frame = Frame { buffer: &buffer, viewport: &viewport, cursor: &cursor, filename: None, message: None }.compose();
        assert!(!text(&frame).contains("Kilo editor"));
    }

    #[test]
    fn status_bar_layout() {
        let mut buffer = buffer_of(&["a", "b", "c"]);
        buffer.insert_char(0, 0, b'z');
        let viewport = Viewport::new(3, 40);
        let cursor = Cursor::at(0, 1);
        let frame = Frame {
            buffer: &buffer,
            viewport: &viewport,
            cursor: &cursor,
            filename: Some(&b"a-rather-long-file-name.txt"[..]),
            message: None,
        }
        .compose();
        let status = &lines(&frame)[3];
        let expected_left = "a-rather-long-file-n - 3 lines (modified)";
        // The left side alone overflows 40 columns, so no right side.
        assert_eq!(status, &format!("\x1b[7m{}\x1b[m", &expected_left[..40]));

        let viewport = Viewport::new(3, 30);
        buffer.mark_clean();
        let frame = Frame { buffer: &buffer, viewport: &viewport, cursor: &cursor, filename: None, message: None }.compose();
        let status = &lines(&frame)[3];
        let left = "[No Name] - 3 lines ";
        let right = "2/3";
        let padding = " ".repeat(30 - left.len() - right.len());
        assert_eq!(status, &format!("\x1b[7m{}{}{}\x1b[m", left, padding, right));
    }

    #[test]
    fn message_bar_is_truncated() {
        let buffer = buffer_of(&[]);
        let viewport = Viewport::new(1, 4);
        let cursor = Cursor::new();
        let frame = Frame {
            buffer: &buffer,
            viewport: &viewport,
            cursor: &cursor,
            filename: None,
            message: Some("HELP: Ctrl-S"),
        }
        .compose();
        let lines = lines(&frame);
        assert!(lines[2].starts_with("\x1b[KHELP\x1b[1;1H"));
    }

    #[test]
    fn cursor_is_placed_relative_to_viewport() {
        let buffer = buffer_of(&["a"; 20]);
        let mut viewport = Viewport::new(5, 10);
        viewport.row_offset = 10;
        viewport.col_offset = 2;
        let cursor = Cursor { cx: 5, cy: 12, rx: 5 };
        let frame = Frame { buffer: &buffer, viewport: &viewport, cursor: &cursor, filename: None, message: None }.compose();
        assert!(frame.ends_with(b"\x1b[3;4H\x1b[?25h"));
    }
}
