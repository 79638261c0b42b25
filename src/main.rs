// src/main.rs
// Usage: tabledfa <table-file> <input-file>
//   TABLEDFA_HALT_AT_END=1   stop quietly when `end` is reached with input left

use std::{env, fs, process::ExitCode};

use anyhow::{Context, Result};
use tabledfa::{EvalOptions, Table, lexer};

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn run(table_path: &str, input_path: &str) -> Result<()> {
    let text = fs::read_to_string(table_path)
        .with_context(|| format!("failed to read table file {table_path}"))?;
    let input =
        fs::read(input_path).with_context(|| format!("failed to read input file {input_path}"))?;

    let table = Table::parse(&text).with_context(|| format!("failed to compile {table_path}"))?;
    let options = EvalOptions {
        halt_at_sink: env_flag("TABLEDFA_HALT_AT_END"),
    };
    let tokens = lexer::lex_with(&table, &input, options)
        .with_context(|| format!("failed to lex {input_path}"))?;

    for t in tokens {
        let kind = t.kind.map_or_else(|| "NONE".to_string(), |k| k.to_string());
        println!("OPCODE: {kind} LEXEME: {}", t.lexeme);
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        let prog = args.first().map(String::as_str).unwrap_or("tabledfa");
        eprintln!("usage: {prog} <table-file> <input-file>");
        return ExitCode::from(2);
    }

    match run(&args[1], &args[2]) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:?}");
            ExitCode::FAILURE
        }
    }
}
