// src/table/build.rs
use std::str::FromStr;

use super::fields::{FIELD_SEP, RECORD_SEP, read_actions, read_key, read_symbol};
use super::scanner::Scanner;
use super::{END, State, StateId, SymbolTable, Table, Transition};
use crate::error::{DfaError, Result};

/// A significant line of the description, with its 1-based number in the source.
#[derive(Clone, Copy)]
struct Line<'a> {
    no: usize,
    text: &'a [u8],
}

impl<'a> Line<'a> {
    fn scanner(self) -> Scanner<'a> {
        Scanner::new(self.text, self.no)
    }
}

/// Drops blank lines and `#` comments; tolerates CRLF line endings.
fn significant_lines(text: &str) -> Vec<Line<'_>> {
    text.split('\n')
        .enumerate()
        .filter_map(|(i, raw)| {
            let raw = raw.strip_suffix('\r').unwrap_or(raw);
            if raw.is_empty() || raw.starts_with('#') {
                None
            } else {
                Some(Line {
                    no: i + 1,
                    text: raw.as_bytes(),
                })
            }
        })
        .collect()
}

// Pass 1: every line declares the state named by its leading field.
fn build_symbols(lines: &[Line<'_>]) -> Result<SymbolTable> {
    let mut symbols = SymbolTable::new();
    for &line in lines {
        let mut sc = line.scanner();
        let name = read_symbol(&mut sc, RECORD_SEP)?;
        if symbols.declare(name).is_none() {
            return Err(DfaError::DuplicateSymbol {
                line: line.no,
                name: name.to_owned(),
            });
        }
    }
    Ok(symbols)
}

fn resolve(symbols: &SymbolTable, name: &str, line: usize) -> Result<StateId> {
    symbols.get(name).ok_or_else(|| DfaError::UnknownSymbol {
        line,
        name: name.to_owned(),
    })
}

// Pass 2: `<from>~<key>$<to>$<actions>~...`, or a bare `end`.
fn build_state(line: Line<'_>, symbols: &SymbolTable) -> Result<State> {
    let mut sc = line.scanner();
    let from_name = read_symbol(&mut sc, RECORD_SEP)?;
    let from = resolve(symbols, from_name, line.no)?;

    let mut state = State::new();
    if from_name == END {
        return Ok(state);
    }

    while !sc.is_at_end() {
        let key = read_key(&mut sc)?;
        let to = resolve(symbols, read_symbol(&mut sc, FIELD_SEP)?, line.no)?;
        let actions = read_actions(&mut sc)?;
        state.insert(key, Transition { from, to, actions });
    }

    log::debug!(
        "[table] line {}: state `{from_name}` (#{from}) has {} transitions",
        line.no,
        state.edges().len()
    );
    Ok(state)
}

impl Table {
    /// Compiles a table description. Nothing usable is returned on failure.
    pub fn parse(text: &str) -> Result<Table> {
        let lines = significant_lines(text);
        let symbols = build_symbols(&lines)?;
        let states = lines
            .iter()
            .map(|&line| build_state(line, &symbols))
            .collect::<Result<Vec<_>>>()?;

        let table = Table { symbols, states };
        log::info!(
            "[table] compiled {} states, {} transitions",
            table.len(),
            table.transition_count()
        );
        Ok(table)
    }
}

impl FromStr for Table {
    type Err = DfaError;

    fn from_str(s: &str) -> Result<Self> {
        Table::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Field;
    use crate::table::{Key, Range};

    const IDENTS: &str = "\
# identifiers and integers, separated by spaces
start~a-z,_$ident$1~0-9$int$1~ $start$
ident~a-z,_,0-9$ident$1~ $start$0
int~0-9$int$1~ $start$0
end
";

    #[test]
    fn builds_dense_states_in_line_order() {
        let t = Table::parse(IDENTS).unwrap();
        assert_eq!(t.len(), 4);
        assert_eq!(t.symbols().names(), ["start", "ident", "int", "end"]);
        assert_eq!(t.transition_count(), 7);
        assert!(t.state(3).unwrap().is_sink());

        let start = t.state(Table::ENTRY).unwrap();
        let (key, tr) = &start.edges()[0];
        assert_eq!(
            *key,
            Key(vec![Range::Span(b'a', b'z'), Range::Byte(b'_')])
        );
        assert_eq!((tr.from, tr.to, tr.actions.as_slice()), (0, 1, &[1][..]));

        // empty action list after the last `$`
        let (_, tr) = &start.edges()[2];
        assert_eq!(tr.to, 0);
        assert!(tr.actions.is_empty());
    }

    #[test]
    fn single_transition_to_end() {
        let t = Table::parse("start~a$end$0~\nend").unwrap();
        let tr = t.state(0).unwrap().transition_for(b'a').unwrap();
        assert_eq!((tr.from, tr.to, tr.actions.clone()), (0, 1, vec![0]));
        assert!(t.state(0).unwrap().transition_for(b'b').is_none());
    }

    #[test]
    fn comments_blank_lines_and_crlf() {
        let t: Table = "#c\r\n\r\nstart~a$end$\r\n\nend\r\n".parse().unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.state(0).unwrap().edges().len(), 1);
    }

    #[test]
    fn destination_may_be_bare_end() {
        let t = Table::parse("s~x$end\nend").unwrap();
        let tr = t.state(0).unwrap().transition_for(b'x').unwrap();
        assert_eq!(tr.to, 1);
        assert!(tr.actions.is_empty());
    }

    #[test]
    fn end_line_ignores_trailing_records() {
        let t = Table::parse("s~a$end$\nend~a$s$0").unwrap();
        assert!(t.state(1).unwrap().is_sink());
    }

    #[test]
    fn duplicate_key_takes_last_definition() {
        let t = Table::parse("s~a$s$0~b$end$~a$end$1,2\nend").unwrap();
        let s = t.state(0).unwrap();
        assert_eq!(s.edges().len(), 2);
        let tr = s.transition_for(b'a').unwrap();
        assert_eq!((tr.to, tr.actions.clone()), (1, vec![1, 2]));
    }

    #[test]
    fn duplicate_symbol() {
        match Table::parse("s~a$s$\nend\n\ns~b$end$") {
            Err(DfaError::DuplicateSymbol { line: 4, name }) => assert_eq!(name, "s"),
            other => panic!("expected DuplicateSymbol, got {other:?}"),
        }
    }

    #[test]
    fn unknown_destination() {
        match Table::parse("s~a$nowhere$0\nend") {
            Err(DfaError::UnknownSymbol { line: 1, name }) => assert_eq!(name, "nowhere"),
            other => panic!("expected UnknownSymbol, got {other:?}"),
        }
    }

    #[test]
    fn malformed_lines_report_position() {
        match Table::parse("s~a$end$0\nend\nt~ab$end$") {
            Err(DfaError::MalformedField {
                line: 3,
                column: 4,
                field: Field::Key,
                ..
            }) => {}
            other => panic!("expected MalformedField, got {other:?}"),
        }
        assert!(matches!(
            Table::parse("start"),
            Err(DfaError::MalformedField {
                field: Field::Symbol,
                ..
            })
        ));
    }

    #[test]
    fn empty_description_is_an_empty_table() {
        let t = Table::parse("# nothing here\n").unwrap();
        assert!(t.is_empty());
    }
}
