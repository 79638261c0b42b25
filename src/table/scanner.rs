// src/table/scanner.rs
// Cursor over one line of a table description. Decodes backslash escapes.

use crate::error::{DfaError, Result};

/// One decoded unit of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scanned {
    /// `escaped` is set when the byte came from a `\x` sequence; escaped bytes
    /// are always literal and never act as separators.
    Char { byte: u8, escaped: bool },
    EndOfLine,
}

#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    line: &'a [u8],
    pos: usize,
    line_no: usize,
}

#[inline]
fn unescape(b: u8) -> Option<u8> {
    Some(match b {
        b'n' => b'\n',
        b't' => b'\t',
        b'v' => 0x0b,
        b'r' => b'\r',
        b'f' => 0x0c,
        b'\\' => b'\\',
        _ => return None,
    })
}

impl<'a> Scanner<'a> {
    pub fn new(line: &'a [u8], line_no: usize) -> Self {
        Self {
            line,
            pos: 0,
            line_no,
        }
    }

    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// 1-based column of the next unread byte.
    pub fn column(&self) -> usize {
        self.pos + 1
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.line.len()
    }

    /// Decodes the next character. At end of line this keeps returning
    /// `EndOfLine` instead of failing.
    pub fn next_char(&mut self) -> Result<Scanned> {
        let Some(&b) = self.line.get(self.pos) else {
            return Ok(Scanned::EndOfLine);
        };
        if b != b'\\' {
            self.pos += 1;
            return Ok(Scanned::Char {
                byte: b,
                escaped: false,
            });
        }

        let column = self.column();
        // A trailing backslash escapes the line break itself.
        let e = self.line.get(self.pos + 1).copied().unwrap_or(b'\n');
        match unescape(e) {
            Some(byte) => {
                self.pos += 2;
                Ok(Scanned::Char {
                    byte,
                    escaped: true,
                })
            }
            None => Err(DfaError::InvalidEscape {
                line: self.line_no,
                column,
                found: char::from(e),
            }),
        }
    }

    /// Raw bytes up to (not including) the first `delim`; the cursor moves past
    /// the delimiter. Returns `None` without moving if `delim` does not occur.
    pub fn read_raw_until(&mut self, delim: u8) -> Option<&'a [u8]> {
        let rest = &self.line[self.pos.min(self.line.len())..];
        let n = rest.iter().position(|&b| b == delim)?;
        self.pos += n + 1;
        Some(&rest[..n])
    }

    /// Everything left on the line; the cursor moves to the end.
    pub fn take_rest(&mut self) -> &'a [u8] {
        let rest = &self.line[self.pos.min(self.line.len())..];
        self.pos = self.line.len();
        rest
    }
}
