#![allow(dead_code)]
use assert_cmd::Command;
use std::io::Write;
use tempfile::NamedTempFile;

pub const NO_OUTPUT: &str = "";
pub const SUCCESS: i32 = 0;
pub const STATIC_ERROR: i32 = 65;
pub const RUNTIME_ERROR: i32 = 70;

/// Writes the program to a temp file, runs the interpreter on it, and
/// checks stdout, stderr, and the exit code exactly.
pub fn run_program(input: &str, expected: &str, expected_error: &str, expected_code: i32) {
    let mut script = NamedTempFile::new().expect("Failed to create temp file");
    write!(script, "{input}").expect("Failed to write to temp file");

    let mut cmd = Command::cargo_bin("rlox").expect("Binary not found");
    cmd.arg(script.path());

    let output = cmd.output().expect("Failed to run binary");

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    let exit_code = output.status.code().unwrap_or(-1);

    assert_eq!(stdout, expected);
    assert_eq!(stderr, expected_error);
    assert_eq!(exit_code, expected_code);
}

/// Like run_program, but additionally feeds the program lines on stdin
/// for the `read` native to consume.
pub fn run_program_with_stdin(
    input: &str,
    stdin: &str,
    expected: &str,
    expected_error: &str,
    expected_code: i32,
) {
    let mut script = NamedTempFile::new().expect("Failed to create temp file");
    write!(script, "{input}").expect("Failed to write to temp file");

    let mut cmd = Command::cargo_bin("rlox").expect("Binary not found");
    cmd.arg(script.path());
    cmd.write_stdin(stdin);

    let output = cmd.output().expect("Failed to run binary");

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    let exit_code = output.status.code().unwrap_or(-1);

    assert_eq!(stdout, expected);
    assert_eq!(stderr, expected_error);
    assert_eq!(exit_code, expected_code);
}

/// Runs the interpreter with no arguments (the REPL), feeding it lines
/// on stdin. The `> ` prompts are part of the expected stdout. The REPL
/// always exits 0.
pub fn run_repl(input: &str, expected: &str, expected_error: &str) {
    let mut cmd = Command::cargo_bin("rlox").expect("Binary not found");
    cmd.write_stdin(input);

    let output = cmd.output().expect("Failed to run binary");

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    let exit_code = output.status.code().unwrap_or(-1);

    assert_eq!(stdout, expected);
    assert_eq!(stderr, expected_error);
    assert_eq!(exit_code, SUCCESS);
}
