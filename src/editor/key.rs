use std::io::{self, Read};

pub const ESCAPE: u8 = 0x1b;
pub const BACKSPACE: u8 = 127;
pub const ENTER: u8 = b'\r';

pub const fn ctrl(key: u8) -> u8 {
    key & 0x1f
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Byte(u8),
    Arrow(ArrowKey),
    Escape,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowKey {
    Left,
    Right,
    Up,
    Down,
}

impl Key {
    /// Maps the bytes that followed an escape byte to a key. Anything not
    /// recognised, including a truncated sequence, is a bare escape.
    pub fn from_escape_sequence(bytes: &[u8]) -> Self {
        match bytes {
            b"[A" => Key::Arrow(ArrowKey::Up),
            b"[B" => Key::Arrow(ArrowKey::Down),
            b"[C" => Key::Arrow(ArrowKey::Right),
            b"[D" => Key::Arrow(ArrowKey::Left),
            b"[3~" => Key::Delete,
            b"[1~" | b"[7~" | b"[H" | b"OH" => Key::Home,
            b"[4~" | b"[8~" | b"[F" | b"OF" => Key::End,
            b"[5~" => Key::PageUp,
            b"[6~" => Key::PageDown,
            _ => Key::Escape,
        }
    }
}

/// One byte, or `None` if the read timed out.
fn read_byte<R: Read>(input: &mut R) -> io::Result<Option<u8>> {
    let mut byte = [0; 1];
    match input.read(&mut byte) {
        Ok(0) => Ok(None),
        Ok(_) => Ok(Some(byte[0])),
        Err(ref e)
            if e.kind() == io::ErrorKind::WouldBlock || e.kind() == io::ErrorKind::Interrupted =>
        {
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Decodes a single key, or returns `None` if no byte arrived before the
/// read timeout. Nothing is retained between calls.
pub fn try_read_key<R: Read>(input: &mut R) -> io::Result<Option<Key>> {
    let first = match read_byte(input)? {
        Some(byte) => byte,
        None => return Ok(None),
    };
    if first != ESCAPE {
        return Ok(Some(Key::Byte(first)));
    }

    let mut seq = [0; 3];
    for slot in seq.iter_mut().take(2) {
        match read_byte(input)? {
            Some(byte) => *slot = byte,
            None => return Ok(Some(Key::Escape)),
        }
    }
    if seq[0] == b'[' && seq[1].is_ascii_digit() {
        match read_byte(input)? {
            Some(byte) => seq[2] = byte,
            None => return Ok(Some(Key::Escape)),
        }
        return Ok(Some(Key::from_escape_sequence(&seq)));
    }
    Ok(Some(Key::from_escape_sequence(&seq[..2])))
}

/// Blocks, polling through read timeouts, until a key arrives.
pub fn read_key<R: Read>(input: &mut R) -> io::Result<Key> {
    loop {
        if let Some(key) = try_read_key(input)? {
            return Ok(key);
        }
    }
}
