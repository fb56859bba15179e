mod buffer;
mod cursor;
mod key;
mod row;
mod screen;
mod status;
mod viewport;

use self::buffer::Buffer;
use self::cursor::Cursor;
use self::key::{ctrl, ArrowKey, Key, BACKSPACE, ENTER};
use self::screen::Frame;
use self::status::StatusMessage;
use self::viewport::Viewport;
use crate::terminal::{self, Error};

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Read, Write};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, trace, warn};

const KILO_QUIT_TIMES: u8 = 3;

const QUIT: u8 = ctrl(b'q');
const SAVE: u8 = ctrl(b's');
const REFRESH: u8 = ctrl(b'l');
const CTRL_H: u8 = ctrl(b'h');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// All editor state. Keys come in through `input` and every frame goes out
/// through `output` in a single write.
pub struct Editor<I, O> {
    input: I,
    output: O,
    buffer: Buffer,
    cursor: Cursor,
    viewport: Viewport,
    filename: Option<PathBuf>,
    status: StatusMessage,
    quit_times: u8,
}

impl<I: Read, O: Write> Editor<I, O> {
    /// `rows` and `cols` are the full terminal size; two rows are kept back
    /// for the status and message bars.
    pub fn new(input: I, output: O, rows: usize, cols: usize) -> Self {
        Editor {
            input,
            output,
            buffer: Buffer::new(),
            cursor: Cursor::new(),
            viewport: Viewport::new(rows.saturating_sub(2), cols),
            filename: None,
            status: StatusMessage::default(),
            quit_times: KILO_QUIT_TIMES,
        }
    }

    /// Loads `path`. A path that does not exist yet gives an empty buffer
    /// that will be created on save.
    pub fn open(&mut self, path: &Path) -> io::Result<()> {
        match File::open(path) {
            Ok(file) => {
                self.buffer = Buffer::load(BufReader::new(file))?;
                debug!(path = %path.display(), lines = self.buffer.len(), "file loaded");
            }
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => {
                self.buffer = Buffer::new();
                debug!(path = %path.display(), "new file");
            }
            Err(e) => return Err(e),
        }
        self.filename = Some(path.to_path_buf());
        self.cursor = Cursor::new();
        Ok(())
    }

    pub fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status = StatusMessage::new(msg);
    }

    /// Refresh, read, dispatch, until the user quits.
    pub fn run(&mut self) -> Result<(), Error> {
        loop {
            self.refresh_screen()?;
            if self.process_keypress()? == Action::Quit {
                return Ok(());
            }
        }
    }

    pub fn refresh_screen(&mut self) -> Result<(), Error> {
        self.viewport.reconcile(&mut self.cursor, &self.buffer);
        let frame = Frame {
            buffer: &self.buffer,
            viewport: &self.viewport,
            cursor: &self.cursor,
            filename: self.filename.as_deref().map(|path| path.as_os_str().as_bytes()),
            message: self.status.visible_at(Instant::now()),
        }
        .compose();
        self.output.write_all(&frame).map_err(Error::Write)?;
        self.output.flush().map_err(Error::Write)
    }

    pub fn process_keypress(&mut self) -> Result<Action, Error> {
        let key = key::read_key(&mut self.input).map_err(Error::Read)?;
        self.process_key(key)
    }

    fn process_key(&mut self, key: Key) -> Result<Action, Error> {
        trace!(?key, "dispatch");
        match key {
            Key::Byte(QUIT) => return self.quit(),
            Key::Byte(SAVE) => self.save()?,
            Key::Byte(ENTER) => self.insert_newline(),
            Key::Byte(BACKSPACE | CTRL_H) => self.delete_char(),
            Key::Delete => {
                self.move_cursor(ArrowKey::Right);
                self.delete_char();
            }
            Key::Byte(REFRESH) | Key::Escape => (),
            Key::Arrow(arrow) => self.move_cursor(arrow),
            Key::Home => self.cursor.cx = 0,
            Key::End => self.cursor.cx = self.current_row_len().unwrap_or(0),
            Key::PageUp => self.page_up(),
            Key::PageDown => self.page_down(),
            Key::Byte(byte) => self.insert_char(byte),
        }
        self.quit_times = KILO_QUIT_TIMES;
        Ok(Action::Continue)
    }

    /// With unsaved changes the warning counts down 3, 2, 1 and the fourth
    /// press quits, so the count shown is always the presses still needed.
    fn quit(&mut self) -> Result<Action, Error> {
        if self.buffer.is_dirty() && self.quit_times > 0 {
            self.set_status_message(format!(
                "WARNING!!! File has unsaved changes. Press Ctrl-Q {} more times to quit.",
                self.quit_times
            ));
            debug!(remaining = self.quit_times, "quit with unsaved changes");
            self.quit_times -= 1;
            return Ok(Action::Continue);
        }
        terminal::clear_screen(&mut self.output).map_err(Error::Write)?;
        Ok(Action::Quit)
    }

    fn save(&mut self) -> Result<(), Error> {
        let path = match self.filename.clone() {
            Some(path) => path,
            None => match self.prompt(|input| format!("Save as: {} (ESC to cancel)", input))? {
                Some(name) => {
                    let path = PathBuf::from(name);
                    self.filename = Some(path.clone());
                    path
                }
                None => {
                    self.set_status_message("Save aborted");
                    return Ok(());
                }
            },
        };

        let bytes = self.buffer.serialize();
        match write_file(&path, &bytes) {
            Ok(()) => {
                self.buffer.mark_clean();
                info!(path = %path.display(), bytes = bytes.len(), "saved");
                self.set_status_message(format!("{} bytes written to disk", bytes.len()));
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "save failed");
                self.set_status_message(format!("Can't save! I/O error: {}", err));
            }
        }
        Ok(())
    }

    /// Reads a line of input on the message bar. `None` if the user hits
    /// escape; enter is ignored until something has been typed.
    fn prompt<F: Fn(&str) -> String>(&mut self, template: F) -> Result<Option<String>, Error> {
        let mut input = String::new();
        loop {
            self.set_status_message(template(&input));
            self.refresh_screen()?;
            match key::read_key(&mut self.input).map_err(Error::Read)? {
                Key::Byte(BACKSPACE | CTRL_H) | Key::Delete => {
                    input.pop();
                }
                Key::Escape => {
                    self.set_status_message("");
                    return Ok(None);
                }
                Key::Byte(ENTER) => {
                    if !input.is_empty() {
                        self.set_status_message("");
                        return Ok(Some(input));
                    }
                }
                Key::Byte(byte) if byte.is_ascii() && !byte.is_ascii_control() => {
                    input.push(char::from(byte));
                }
                _ => (),
            }
        }
    }

    fn current_row_len(&self) -> Option<usize> {
        self.buffer.row(self.cursor.cy).map(|row| row.len())
    }

    fn insert_char(&mut self, byte: u8) {
        if self.cursor.cy == self.buffer.len() {
            self.buffer.insert_row(self.buffer.len(), b"");
        }
        self.buffer.insert_char(self.cursor.cy, self.cursor.cx, byte);
        self.cursor.cx += 1;
    }

    fn insert_newline(&mut self) {
        if self.cursor.cx == 0 {
            self.buffer.insert_row(self.cursor.cy, b"");
        } else {
            let tail = self.buffer.split_row(self.cursor.cy, self.cursor.cx);
            self.buffer.insert_row(self.cursor.cy + 1, &tail);
        }
        self.cursor.cy += 1;
        self.cursor.cx = 0;
    }

    fn delete_char(&mut self) {
        let Cursor { cx, cy, .. } = self.cursor;
        if cy == self.buffer.len() || (cx == 0 && cy == 0) {
            return;
        }
        if cx > 0 {
            self.buffer.delete_char(cy, cx - 1);
            self.cursor.cx -= 1;
        } else {
            let contents = match self.buffer.row(cy) {
                Some(row) => row.contents().to_vec(),
                None => return,
            };
            self.cursor.cx = self.buffer.row(cy - 1).map_or(0, |row| row.len());
            self.buffer.append_string(cy - 1, &contents);
            self.buffer.delete_row(cy);
            self.cursor.cy -= 1;
        }
    }

    fn move_cursor(&mut self, arrow: ArrowKey) {
        match arrow {
            ArrowKey::Left => {
                if self.cursor.cx > 0 {
                    self.cursor.cx -= 1;
                } else if self.cursor.cy > 0 {
                    self.cursor.cy -= 1;
                    self.cursor.cx = self.current_row_len().unwrap_or(0);
                }
            }
            ArrowKey::Right => {
                if let Some(len) = self.current_row_len() {
                    if self.cursor.cx < len {
                        self.cursor.cx += 1;
                    } else if self.cursor.cx == len {
                        self.cursor.cy += 1;
                        self.cursor.cx = 0;
                    }
                }
            }
            ArrowKey::Up => {
                if self.cursor.cy > 0 {
                    self.cursor.cy -= 1;
                }
            }
            ArrowKey::Down => {
                if self.cursor.cy < self.buffer.len() {
                    self.cursor.cy += 1;
                }
            }
        }
        let len = self.current_row_len().unwrap_or(0);
        if self.cursor.cx > len {
            self.cursor.cx = len;
        }
    }

    fn page_up(&mut self) {
        self.cursor.cy = self.viewport.row_offset;
        for _ in 0..self.viewport.screen_rows {
            self.move_cursor(ArrowKey::Up);
        }
    }

    fn page_down(&mut self) {
        let bottom = (self.viewport.row_offset + self.viewport.screen_rows).saturating_sub(1);
        self.cursor.cy = bottom.min(self.buffer.len());
        for _ in 0..self.viewport.screen_rows {
            self.move_cursor(ArrowKey::Down);
        }
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o644)
        .open(path)?;
    file.write_all(bytes)
}
