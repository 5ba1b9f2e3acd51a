mod environment;
mod error;
mod expr;
mod interpreter;
mod lox;
mod parser;
mod resolver;
mod scanner;
mod stmt;
mod token;
mod value;

use crate::lox::Lox;
use anyhow::Result;
use std::env;
use std::process::exit;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: {} [script]", args[0]);
        exit(64);
    }

    let mut lox = Lox::new();
    match args.get(1) {
        Some(path) => lox.run_file(path),
        None => lox.run_prompt(),
    }
}
