// src/bin/dump_table.rs
// Compile a table description and print it as JSON.
// Usage:
//   cargo run --bin dump_table -- states.txt              # JSON to stdout
//   cargo run --bin dump_table -- states.txt out.json

use std::{env, fs, path::Path};

use anyhow::{Context, Result, bail};
use tabledfa::table::{Table, save_table_json, table_to_json};

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let Some(src) = args.next() else {
        bail!("usage: dump_table <table-file> [out.json]");
    };

    let text = fs::read_to_string(&src).with_context(|| format!("read {src}"))?;
    let table = Table::parse(&text).with_context(|| format!("compile {src}"))?;
    eprintln!(
        "[dump_table] {} states, {} transitions",
        table.len(),
        table.transition_count()
    );

    match args.next() {
        Some(out) => {
            let out_path = Path::new(&out);
            if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
            save_table_json(out_path, &table).with_context(|| format!("write {out}"))?;
            eprintln!("[dump_table] wrote {}", out_path.display());
        }
        None => println!("{}", table_to_json(&table)?),
    }
    Ok(())
}
