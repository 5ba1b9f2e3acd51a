use crate::error;
use crate::expr::ExprId;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::Scanner;
use anyhow::{Context, Result};
use std::fs;
use std::io::{self, BufRead, Write};
use std::process::exit;

/// The driver that owns one interpreter for the life of the process and
/// feeds it programs: a whole script in file mode, or one line at a time
/// at the prompt. Keeping the interpreter (and the parser's id watermark)
/// here is what lets REPL definitions survive from line to line.
pub struct Lox {
    interpreter: Interpreter,
    next_expr_id: ExprId,
}

impl Lox {
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
            next_expr_id: 0,
        }
    }

    pub fn run_file(&mut self, path: &str) -> Result<()> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("could not read script '{path}'"))?;
        self.run(source);

        if error::had_error() {
            exit(65);
        }
        if error::had_runtime_error() {
            exit(70);
        }
        Ok(())
    }

    /// The interactive prompt: each line is a complete program fragment
    /// run against the persistent interpreter. Errors never end the
    /// session; both flags reset before the next line.
    pub fn run_prompt(&mut self) -> Result<()> {
        let stdin = io::stdin();
        loop {
            print!("> ");
            io::stdout().flush().context("could not flush prompt")?;

            let mut line = String::new();
            let read = stdin
                .lock()
                .read_line(&mut line)
                .context("could not read from stdin")?;
            if read == 0 {
                // EOF ends the session.
                return Ok(());
            }

            self.run(line);
            error::reset();
        }
    }

    /// The pipeline: scan, parse, resolve, interpret, with each phase
    /// gated on the one before it having produced no errors.
    fn run(&mut self, source: String) {
        let mut scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens();

        let mut parser = Parser::new(tokens, self.next_expr_id);
        let statements = parser.parse();
        self.next_expr_id = parser.next_expr_id();

        if error::had_error() {
            return;
        }

        let locals = Resolver::new().resolve(&statements);

        // Stop if there was a resolution error.
        if error::had_error() {
            return;
        }

        self.interpreter.resolve(locals);
        self.interpreter.interpret(&statements);
    }
}
