// src/table/fields.rs
// Lexers for the three field types of a table line: state names, keys and
// action lists.

use super::scanner::{Scanned, Scanner};
use super::{ActionId, END, Key, Range};
use crate::error::{DfaError, Field, Result};

/// Separates key, destination and action list within a transition record.
pub const FIELD_SEP: u8 = b'$';
/// Terminates the leading state name and each transition record.
pub const RECORD_SEP: u8 = b'~';

fn malformed(sc: &Scanner<'_>, column: usize, field: Field, reason: &'static str) -> DfaError {
    DfaError::MalformedField {
        line: sc.line_no(),
        column,
        field,
        reason,
    }
}

/// Unescaped bytes allowed inside a key: printable ASCII except the two
/// separators, plus the control band `\t`..=`\r`.
#[inline]
fn is_key_literal(b: u8) -> bool {
    matches!(b, 0x09..=0x0d | 0x20..=0x7e) && b != FIELD_SEP && b != RECORD_SEP
}

/// Reads a state name up to `delim` and moves past it. Without a delimiter the
/// rest of the line is accepted only if it is the reserved name `end`.
pub fn read_symbol<'a>(sc: &mut Scanner<'a>, delim: u8) -> Result<&'a str> {
    let column = sc.column();
    let raw = match sc.read_raw_until(delim) {
        Some(raw) => raw,
        None => {
            let rest = sc.take_rest();
            if rest != END.as_bytes() {
                return Err(malformed(
                    sc,
                    column,
                    Field::Symbol,
                    "missing separator after state name",
                ));
            }
            rest
        }
    };
    if raw.is_empty() {
        return Err(malformed(sc, column, Field::Symbol, "empty state name"));
    }
    std::str::from_utf8(raw)
        .map_err(|_| malformed(sc, column, Field::Symbol, "state name is not valid UTF-8"))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum KeyTok {
    Start,
    Char,
    Span,
    Comma,
}

/// Reads `range(,range)*$` where a range is `c` or `c-c`.
pub fn read_key(sc: &mut Scanner<'_>) -> Result<Key> {
    use KeyTok::*;

    let mut ranges = Vec::new();
    let mut pending: Option<Range> = None;
    let mut last = Start;

    loop {
        let column = sc.column();
        let (byte, escaped) = match sc.next_char()? {
            Scanned::EndOfLine => {
                return Err(malformed(sc, column, Field::Key, "key is not terminated by `$`"));
            }
            Scanned::Char { byte, escaped } => (byte, escaped),
        };

        match (byte, escaped) {
            (FIELD_SEP, false) => {
                if !matches!(last, Char | Span) {
                    return Err(malformed(
                        sc,
                        column,
                        Field::Key,
                        "`$` must follow a character or range",
                    ));
                }
                ranges.extend(pending.take());
                return Ok(Key(ranges));
            }
            (b',', false) => {
                if !matches!(last, Char | Span) {
                    return Err(malformed(
                        sc,
                        column,
                        Field::Key,
                        "`,` must follow a character or range",
                    ));
                }
                ranges.extend(pending.take());
                last = Comma;
            }
            (b'-', false) => {
                let Some(Range::Byte(lo)) = pending.filter(|_| last == Char) else {
                    return Err(malformed(
                        sc,
                        column,
                        Field::Key,
                        "`-` must follow a single character",
                    ));
                };
                let hi_column = sc.column();
                let hi = match sc.next_char()? {
                    Scanned::Char { byte, escaped } if escaped || is_key_literal(byte) => byte,
                    Scanned::Char { .. } => {
                        return Err(malformed(
                            sc,
                            hi_column,
                            Field::Key,
                            "byte not allowed in a key",
                        ));
                    }
                    Scanned::EndOfLine => {
                        return Err(malformed(
                            sc,
                            hi_column,
                            Field::Key,
                            "range is missing its upper bound",
                        ));
                    }
                };
                pending = Some(Range::Span(lo, hi));
                last = Span;
            }
            (b, escaped) => {
                if !matches!(last, Start | Comma) {
                    return Err(malformed(
                        sc,
                        column,
                        Field::Key,
                        "expected `,`, `-` or `$` after a character",
                    ));
                }
                if !escaped && !is_key_literal(b) {
                    return Err(malformed(sc, column, Field::Key, "byte not allowed in a key"));
                }
                pending = Some(Range::Byte(b));
                last = Char;
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ActTok {
    Start,
    Digit,
    Comma,
}

/// Reads `n(,n)*` up to `~` or end of line. An empty field yields no actions.
pub fn read_actions(sc: &mut Scanner<'_>) -> Result<Vec<ActionId>> {
    use ActTok::*;

    let mut out = Vec::new();
    let mut cur: ActionId = 0;
    let mut last = Start;

    loop {
        let column = sc.column();
        match sc.next_char()? {
            Scanned::EndOfLine
            | Scanned::Char {
                byte: RECORD_SEP,
                escaped: false,
            } => {
                return match last {
                    Start => Ok(out),
                    Digit => {
                        out.push(cur);
                        Ok(out)
                    }
                    Comma => Err(malformed(
                        sc,
                        column,
                        Field::Actions,
                        "trailing `,` in action list",
                    )),
                };
            }
            Scanned::Char {
                byte: b',',
                escaped: false,
            } => {
                if last != Digit {
                    return Err(malformed(
                        sc,
                        column,
                        Field::Actions,
                        "`,` must follow an action index",
                    ));
                }
                out.push(cur);
                cur = 0;
                last = Comma;
            }
            Scanned::Char {
                byte: d @ b'0'..=b'9',
                ..
            } => {
                cur = cur
                    .checked_mul(10)
                    .and_then(|v| v.checked_add((d - b'0') as ActionId))
                    .ok_or_else(|| {
                        malformed(sc, column, Field::Actions, "action index is too large")
                    })?;
                last = Digit;
            }
            Scanned::Char { .. } => {
                return Err(malformed(
                    sc,
                    column,
                    Field::Actions,
                    "expected a digit, `,` or `~`",
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> Result<Key> {
        read_key(&mut Scanner::new(s.as_bytes(), 1))
    }

    fn actions(s: &str) -> Result<Vec<ActionId>> {
        read_actions(&mut Scanner::new(s.as_bytes(), 1))
    }

    fn is_malformed<T: std::fmt::Debug>(r: Result<T>, want: Field) -> bool {
        matches!(r, Err(DfaError::MalformedField { field, .. }) if field == want)
    }

    #[test]
    fn symbol_with_delimiter() {
        let mut sc = Scanner::new(b"start~a$b$~", 1);
        assert_eq!(read_symbol(&mut sc, RECORD_SEP).unwrap(), "start");
        assert_eq!(sc.column(), 7);
    }

    #[test]
    fn undelimited_symbol_must_be_end() {
        let mut sc = Scanner::new(b"end", 1);
        assert_eq!(read_symbol(&mut sc, RECORD_SEP).unwrap(), "end");
        assert!(sc.is_at_end());

        let mut sc = Scanner::new(b"start", 2);
        assert!(is_malformed(read_symbol(&mut sc, RECORD_SEP), Field::Symbol));

        let mut sc = Scanner::new(b"~a$b$", 2);
        assert!(is_malformed(read_symbol(&mut sc, RECORD_SEP), Field::Symbol));
    }

    #[test]
    fn key_alternatives_and_ranges() {
        assert_eq!(
            key("a-z,_,0-9$").unwrap(),
            Key(vec![
                Range::Span(b'a', b'z'),
                Range::Byte(b'_'),
                Range::Span(b'0', b'9'),
            ])
        );
        assert_eq!(key("x$").unwrap(), Key(vec![Range::Byte(b'x')]));
    }

    #[test]
    fn key_escapes_are_literal() {
        assert_eq!(
            key(r"\n,\t-\r$").unwrap(),
            Key(vec![Range::Byte(b'\n'), Range::Span(b'\t', b'\r')])
        );
        assert_eq!(key(r"\\$").unwrap(), Key(vec![Range::Byte(b'\\')]));
    }

    #[test]
    fn key_range_upper_bound_is_literal() {
        assert_eq!(key("+--$").unwrap(), Key(vec![Range::Span(b'+', b'-')]));
    }

    #[test]
    fn key_sequencing_errors() {
        for bad in ["$", ",a$", "a,$", "a--b$", "a-b-c$", "ab$", "a-$", "a", "a-", ",", "a,,b$"] {
            assert!(is_malformed(key(bad), Field::Key), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn key_allow_list() {
        assert!(is_malformed(key("~$"), Field::Key));
        assert!(is_malformed(key("a-~$"), Field::Key));
        assert!(is_malformed(key("\u{7f}$"), Field::Key));
        assert!(is_malformed(key("é$"), Field::Key));
        // raw tab is inside the control band
        assert_eq!(key("\t$").unwrap(), Key(vec![Range::Byte(b'\t')]));
        assert!(is_malformed(key("\u{1}$"), Field::Key));
    }

    #[test]
    fn key_bad_escape() {
        assert!(matches!(key(r"\x$"), Err(DfaError::InvalidEscape { found: 'x', .. })));
    }

    #[test]
    fn action_lists() {
        assert_eq!(actions("0~").unwrap(), vec![0]);
        assert_eq!(actions("1,0,12").unwrap(), vec![1, 0, 12]);
        assert_eq!(actions("").unwrap(), Vec::<ActionId>::new());
        assert_eq!(actions("~rest").unwrap(), Vec::<ActionId>::new());
    }

    #[test]
    fn action_list_stops_at_record_separator() {
        let mut sc = Scanner::new(b"3,4~b$x$", 1);
        assert_eq!(read_actions(&mut sc).unwrap(), vec![3, 4]);
        assert_eq!(sc.take_rest(), b"b$x$");
    }

    #[test]
    fn action_list_errors() {
        for bad in [",1", "1,", "1,,2", "1a", "a", "1 2", "99999999999999999999999"] {
            assert!(is_malformed(actions(bad), Field::Actions), "{bad:?} should be rejected");
        }
    }
}
