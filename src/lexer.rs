// src/lexer.rs
// A small token-accumulating action set on top of the table engine.

use std::fmt;

use crate::error::Result;
use crate::eval::{ActionSet, EvalOptions, Evaluator};
use crate::table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum TokenKind {
    Foo = 1,
    Bar = 2,
    Baz = 3,
    Qux = 4,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::Foo => "FOO",
            TokenKind::Bar => "BAR",
            TokenKind::Baz => "BAZ",
            TokenKind::Qux => "QUX",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// `None` if no kind was set before the token was saved.
    pub kind: Option<TokenKind>,
    pub lexeme: String,
}

/// Context threaded through the lexer actions.
#[derive(Debug, Default)]
pub struct LexState {
    tokens: Vec<Token>,
    cur_kind: Option<TokenKind>,
    cur_lexeme: Vec<u8>,
}

impl LexState {
    /// Emits the pending token. The lexeme is cleared; the kind carries over.
    pub fn add_token(&mut self) {
        let lexeme = String::from_utf8_lossy(&self.cur_lexeme).into_owned();
        self.tokens.push(Token {
            kind: self.cur_kind,
            lexeme,
        });
        self.cur_lexeme.clear();
    }

    pub fn set_kind(&mut self, kind: TokenKind) {
        self.cur_kind = Some(kind);
    }

    pub fn append_char(&mut self, b: u8) {
        self.cur_lexeme.push(b);
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

pub const SAVE_TOKEN: usize = 0;
pub const APPEND_CHAR: usize = 1;
pub const SET_KIND_FOO: usize = 2;
pub const SET_KIND_BAR: usize = 3;
pub const SET_KIND_BAZ: usize = 4;
pub const SET_KIND_QUX: usize = 5;

/// Actions in table order: 0 save, 1 append, 2..=5 set kind FOO..QUX.
pub fn lex_actions() -> ActionSet<LexState> {
    ActionSet::new()
        .with(|_, ls: &mut LexState| ls.add_token())
        .with(|b, ls: &mut LexState| ls.append_char(b))
        .with(|_, ls: &mut LexState| ls.set_kind(TokenKind::Foo))
        .with(|_, ls: &mut LexState| ls.set_kind(TokenKind::Bar))
        .with(|_, ls: &mut LexState| ls.set_kind(TokenKind::Baz))
        .with(|_, ls: &mut LexState| ls.set_kind(TokenKind::Qux))
}

pub fn lex_with(table: &Table, input: &[u8], options: EvalOptions) -> Result<Vec<Token>> {
    let actions = lex_actions();
    let mut ls = LexState::default();
    Evaluator::new(table, &actions)
        .with_options(options)
        .run(input, &mut ls)?;
    Ok(ls.into_tokens())
}

pub fn lex(table: &Table, input: &[u8]) -> Result<Vec<Token>> {
    lex_with(table, input, EvalOptions::default())
}
