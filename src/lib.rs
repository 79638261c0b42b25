// src/lib.rs
//! Table-driven DFA engine.
//!
//! A textual transition table is compiled into a [`Table`], which an
//! [`Evaluator`] then walks over an input byte sequence, firing the
//! caller's [`ActionSet`] callbacks on every transition taken.
//!
//! Table lines look like `<from>~<key>$<to>$<actions>~...`, or just `end`
//! for a state with no outgoing transitions.

pub mod error;
pub mod eval;
pub mod lexer;
pub mod table;

pub use error::{DfaError, Field, Result};
pub use eval::{ActionSet, EvalOptions, Evaluator, Run, evaluate};
pub use table::{ActionId, Key, Range, State, StateId, SymbolTable, Table, Transition};
