use std::io::{self, Read, Write};
use std::mem;
use std::panic;
use std::str;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum Error {
    #[error("tcgetattr")]
    GetAttributes(#[source] io::Error),
    #[error("tcsetattr")]
    SetAttributes(#[source] io::Error),
    #[error("unable to determine window size")]
    WindowSize,
    #[error("read")]
    Read(#[source] io::Error),
    #[error("write")]
    Write(#[source] io::Error),
}

/// Keeps stdin in raw mode for as long as it is alive. The attributes that
/// were active before `enable` are put back on drop, and by a panic hook if
/// the process unwinds without reaching the drop.
pub struct RawMode {
    original: libc::termios,
}

impl RawMode {
    pub fn enable() -> Result<Self, Error> {
        let original = get_attributes()?;
        let mut termios = original;

        termios.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
        termios.c_oflag &= !libc::OPOST;
        termios.c_cflag |= libc::CS8;
        termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
        // Return after the first byte, or after 100ms with nothing.
        termios.c_cc[libc::VMIN] = 0;
        termios.c_cc[libc::VTIME] = 1;

        set_attributes(&termios)?;
        install_panic_hook(original);
        debug!("raw mode enabled");
        Ok(RawMode { original })
    }

    pub fn restore(&self) -> Result<(), Error> {
        set_attributes(&self.original)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

fn install_panic_hook(original: libc::termios) {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        unsafe {
            libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &original);
        }
        previous(info);
    }));
}

fn get_attributes() -> Result<libc::termios, Error> {
    unsafe {
        let mut termios: libc::termios = mem::zeroed();
        if libc::tcgetattr(libc::STDIN_FILENO, &mut termios) == -1 {
            return Err(Error::GetAttributes(io::Error::last_os_error()));
        }
        Ok(termios)
    }
}

fn set_attributes(termios: &libc::termios) -> Result<(), Error> {
    let errno = unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, termios) };
    if errno == -1 {
        return Err(Error::SetAttributes(io::Error::last_os_error()));
    }
    Ok(())
}

/// Terminal size as `(rows, cols)`. Asks the kernel first and falls back to
/// pushing the cursor into the bottom-right corner and asking the terminal
/// where it ended up.
pub fn window_size<R: Read, W: Write>(input: &mut R, output: &mut W) -> Result<(usize, usize), Error> {
    unsafe {
        let mut ws: libc::winsize = mem::zeroed();
        let errno = libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws);
        if errno != -1 && ws.ws_col != 0 {
            return Ok((ws.ws_row as usize, ws.ws_col as usize));
        }
    }
    debug!("TIOCGWINSZ unavailable, falling back to cursor position report");
    output.write_all(b"\x1b[999C\x1b[999B").map_err(Error::Write)?;
    cursor_position(input, output)
}

fn cursor_position<R: Read, W: Write>(input: &mut R, output: &mut W) -> Result<(usize, usize), Error> {
    output.write_all(b"\x1b[6n").map_err(Error::Write)?;
    output.flush().map_err(Error::Write)?;

    let mut reply = Vec::with_capacity(32);
    let mut byte = [0; 1];
    while reply.len() < 32 {
        match input.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => {
                reply.push(byte[0]);
                if byte[0] == b'R' {
                    break;
                }
            }
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => break,
            Err(e) => return Err(Error::Read(e)),
        }
    }

    match parse_cursor_report(&reply) {
        Some((rows, cols)) if rows > 0 && cols > 0 => Ok((rows, cols)),
        _ => Err(Error::WindowSize),
    }
}

/// Parses a cursor position report of the form `ESC [ rows ; cols R`.
pub fn parse_cursor_report(reply: &[u8]) -> Option<(usize, usize)> {
    let body = reply.strip_prefix(b"\x1b[")?;
    let body = body.strip_suffix(b"R")?;
    let (rows, cols) = str::from_utf8(body).ok()?.split_once(';')?;
    Some((rows.parse().ok()?, cols.parse().ok()?))
}

pub fn clear_screen<W: Write>(output: &mut W) -> io::Result<()> {
    output.write_all(b"\x1b[2J\x1b[H")?;
    output.flush()
}
