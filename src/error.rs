use crate::token::{Token, TokenType};
use crate::value::object::Object;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Process-wide error flags. The parser and resolver set the first, the
/// evaluator the second; the driver consults both to pick an exit code and
/// to skip later phases. The REPL clears them between lines.
static HAD_ERROR: AtomicBool = AtomicBool::new(false);
static HAD_RUNTIME_ERROR: AtomicBool = AtomicBool::new(false);

/// A runtime failure, carrying the token whose evaluation went wrong so the
/// diagnostic can point at a source line.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl RuntimeError {
    pub fn new(token: Token, message: impl Into<String>) -> Self {
        Self {
            token,
            message: message.into(),
        }
    }
}

/// Marker for the parser's panic mode. The diagnostic is reported before
/// this is returned, so it carries no payload; callers only use it to
/// unwind to a synchronization point.
#[derive(Debug, Clone, Copy, Error)]
#[error("parse error")]
pub struct ParseError;

/// Why statement execution stopped early. A `return` unwinds to the nearest
/// function boundary; it is control flow, not an error, and never touches
/// the error flags. Expressions can only fail with `RuntimeError`, so the
/// two cases stay disjoint by construction.
#[derive(Debug)]
pub enum Unwind {
    Return(Object),
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(error: RuntimeError) -> Self {
        Unwind::Error(error)
    }
}

pub fn error(line: usize, message: &str) {
    report(line, "", message);
}

/// Reports a static error at a token, pointing at the lexeme, or at the
/// end of the file when the token is the EOF sentinel.
pub fn error_token(token: &Token, message: &str) {
    if token.token_type == TokenType::EOF {
        report(token.line, " at end", message);
    } else {
        report(token.line, &format!(" at '{}'", token.lexeme), message);
    }
}

fn report(line: usize, location: &str, message: &str) {
    eprintln!("[line {line}] Error{location}: {message}");
    HAD_ERROR.store(true, Ordering::Relaxed);
}

pub fn runtime_error(error: &RuntimeError) {
    eprintln!("{}\n[line {}]", error.message, error.token.line);
    HAD_RUNTIME_ERROR.store(true, Ordering::Relaxed);
}

pub fn had_error() -> bool {
    HAD_ERROR.load(Ordering::Relaxed)
}

pub fn had_runtime_error() -> bool {
    HAD_RUNTIME_ERROR.load(Ordering::Relaxed)
}

pub fn reset() {
    HAD_ERROR.store(false, Ordering::Relaxed);
    HAD_RUNTIME_ERROR.store(false, Ordering::Relaxed);
}
