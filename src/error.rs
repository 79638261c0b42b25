// src/error.rs
use std::fmt;

use thiserror::Error;

/// Which field lexer rejected its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Symbol,
    Key,
    Actions,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Symbol => "symbol",
            Field::Key => "key",
            Field::Actions => "action-list",
        })
    }
}

/// Everything that can go wrong while compiling a table or running it.
///
/// Build errors carry the 1-based line and column in the table description;
/// evaluation errors carry the byte offset into the input.
#[derive(Debug, Error)]
pub enum DfaError {
    #[error("line {line}, column {column}: invalid escape sequence, backslash followed by {found:?}")]
    InvalidEscape {
        line: usize,
        column: usize,
        found: char,
    },

    #[error("line {line}, column {column}: malformed {field} field: {reason}")]
    MalformedField {
        line: usize,
        column: usize,
        field: Field,
        reason: &'static str,
    },

    #[error("line {line}: state `{name}` is declared more than once")]
    DuplicateSymbol { line: usize, name: String },

    #[error("line {line}: state `{name}` is never declared")]
    UnknownSymbol { line: usize, name: String },

    #[error("invalid state index {index}")]
    InvalidState { index: usize },

    #[error("no transition from state `{state}` on byte 0x{byte:02X} ({:?}) at offset {offset}", char::from(*.byte))]
    NoTransition {
        state: String,
        byte: u8,
        offset: usize,
    },

    #[error("action {action} is out of range ({available} actions supplied) at offset {offset}")]
    UnknownAction {
        action: usize,
        available: usize,
        offset: usize,
    },

    #[error("failed to (de)serialize table JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DfaError>;
