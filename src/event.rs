use std::io::{ErrorKind, Read};

use crate::error::{EditorError, Result};

pub const ESC: u8 = 0x1b;
pub const ENTER: u8 = b'\r';
pub const BACKSPACE: u8 = 127;

/// The byte a terminal sends for Ctrl + `c`.
pub const fn ctrl(c: u8) -> u8 {
    c & 0x1f
}

/// A decoded keypress.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Key {
    /// A printable (or high) byte.
    Char(u8),
    /// Any other control byte, carried as sent (e.g. `0x13` for Ctrl+S).
    Ctrl(u8),
    Enter,
    Backspace,
    Escape,

    Up,
    Down,
    Left,
    Right,
}

impl Key {
    pub const fn from_byte(b: u8) -> Key {
        match b {
            ENTER => Key::Enter,
            BACKSPACE => Key::Backspace,
            ESC => Key::Escape,
            0..=0x1f => Key::Ctrl(b),
            _ => Key::Char(b),
        }
    }
}

/// Turns the raw input byte stream into [`Key`]s.
///
/// An escape byte looks ahead two bytes. `ESC [ A..D` are the arrow keys;
/// every other pair is consumed and reported as a plain [`Key::Escape`].
/// If the lookahead runs dry (end of input, or a non-blocking source with
/// nothing pending) the escape stands on its own.
pub struct KeyDecoder<R> {
    input: R,
}

impl<R: Read> KeyDecoder<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    pub fn into_inner(self) -> R {
        self.input
    }

    pub fn read_key(&mut self) -> Result<Key> {
        let c = self.read_byte()?;
        if c != ESC {
            return Ok(Key::from_byte(c));
        }

        let Some(first) = self.try_read_byte()? else {
            return Ok(Key::Escape);
        };
        let Some(second) = self.try_read_byte()? else {
            return Ok(Key::Escape);
        };

        if first == b'[' {
            match second {
                b'A' => return Ok(Key::Up),
                b'B' => return Ok(Key::Down),
                b'C' => return Ok(Key::Right),
                b'D' => return Ok(Key::Left),
                _ => {}
            }
        }

        tracing::trace!(target: "input", first, second, "escape_sequence_discarded");
        Ok(Key::Escape)
    }

    /// Block until one byte arrives. End of input is fatal.
    fn read_byte(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        loop {
            match self.input.read(&mut buf) {
                Ok(1) => return Ok(buf[0]),
                Ok(_) => return Err(EditorError::InputClosed),
                Err(e) if matches!(e.kind(), ErrorKind::Interrupted | ErrorKind::WouldBlock) => {
                    continue
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn try_read_byte(&mut self) -> Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.input.read(&mut buf) {
                Ok(1) => return Ok(Some(buf[0])),
                Ok(_) => return Ok(None),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    return Ok(None)
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
