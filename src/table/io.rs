// src/table/io.rs
use std::io::{BufWriter, Write};

use serde::{Deserialize, Serialize};

use super::{ActionId, Key, State, StateId, SymbolTable, Table, Transition};
use crate::error::{DfaError, Result};

// -------------------- JSON (de)serialization --------------------

#[derive(Serialize, Deserialize)]
struct EdgeDisk {
    key: Key,
    to: StateId,
    actions: Vec<ActionId>,
}

#[derive(Serialize, Deserialize)]
struct StateDisk {
    name: String,
    transitions: Vec<EdgeDisk>,
}

/// States in index order; edges in match order.
#[derive(Serialize, Deserialize)]
struct TableDisk {
    states: Vec<StateDisk>,
}

impl From<&Table> for TableDisk {
    fn from(t: &Table) -> Self {
        let states = t
            .symbols
            .names()
            .iter()
            .zip(&t.states)
            .map(|(name, state)| StateDisk {
                name: name.clone(),
                transitions: state
                    .edges()
                    .iter()
                    .map(|(key, tr)| EdgeDisk {
                        key: key.clone(),
                        to: tr.to,
                        actions: tr.actions.clone(),
                    })
                    .collect(),
            })
            .collect();
        Self { states }
    }
}

impl TableDisk {
    fn into_table(self) -> Result<Table> {
        let n = self.states.len();
        let mut symbols = SymbolTable::new();
        let mut states = Vec::with_capacity(n);

        for (from, disk) in self.states.into_iter().enumerate() {
            if symbols.declare(&disk.name).is_none() {
                return Err(DfaError::DuplicateSymbol {
                    line: from + 1,
                    name: disk.name,
                });
            }
            let mut state = State::new();
            for e in disk.transitions {
                if e.to >= n {
                    return Err(DfaError::InvalidState { index: e.to });
                }
                state.insert(
                    e.key,
                    Transition {
                        from,
                        to: e.to,
                        actions: e.actions,
                    },
                );
            }
            states.push(state);
        }

        Ok(Table { symbols, states })
    }
}

pub fn table_to_json(t: &Table) -> Result<String> {
    Ok(serde_json::to_string_pretty(&TableDisk::from(t))?)
}

pub fn save_table_json(path: &std::path::Path, t: &Table) -> std::io::Result<()> {
    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, &TableDisk::from(t))?;
    w.flush()?;
    log::info!("[table] saved {} states to {}", t.len(), path.display());
    Ok(())
}

/// Loads a table written by [`save_table_json`]. Destinations are checked
/// against the number of states.
pub fn load_table_json_bytes(data: &[u8]) -> Result<Table> {
    serde_json::from_slice::<TableDisk>(data)?.into_table()
}
