//! End-to-end tests for the `simple` binary.

use pretty_assertions::assert_eq;
use std::io::Write;
use std::process::{Command, Output, Stdio};

/// Run the binary with `args`, feeding `script` on stdin.
fn simple(args: &[&str], script: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_simple"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn simple");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(script.as_bytes())
        .expect("write script");
    child.wait_with_output().expect("wait for simple")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn runs_script_from_stdin() {
    let out = simple(&["-"], r#"i = 0; while i < 2 { write("tick " + i); i = i + 1; }"#);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), "tick 0\ntick 1\n");
    assert_eq!(stderr(&out), "");
}

#[test]
fn runtime_error_keeps_earlier_output() {
    let out = simple(&["-"], r#"write("before"); x = missing;"#);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stdout(&out), "before\n");
    assert_eq!(
        stderr(&out),
        concat!(
            "error[undefined_variable]: <stdin>:1:22: undefined variable: missing\n",
            "  |\n",
            "1 | write(\"before\"); x = missing;\n",
            "  |                      ^\n",
        )
    );
}

#[test]
fn long_expression_is_rejected_without_crashing() {
    let script = format!("x = 1{}; write(x);", " + 1".repeat(60_000));
    let out = simple(&["-"], &script);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).starts_with("error[parse_error]:"), "{}", stderr(&out));
    assert!(stderr(&out).contains("nests deeper"), "{}", stderr(&out));
}

#[test]
fn max_depth_is_configurable() {
    let script = format!("x = 1{}; write(x);", " + 1".repeat(40));
    let out = simple(&["--max-depth", "16", "-"], &script);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).starts_with("error[stack_overflow]:"), "{}", stderr(&out));

    let out = simple(&["-"], &script);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), "41\n");
}

#[test]
fn parse_error_is_reported_with_location() {
    let out = simple(&["-"], "x = 1;\ny = 4 / 2;\n");
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stdout(&out), "");
    assert!(stderr(&out).starts_with("error[parse_error]: <stdin>:2:"), "{}", stderr(&out));
    assert!(stderr(&out).contains("2 | y = 4 / 2;"), "{}", stderr(&out));
}

#[test]
fn json_errors() {
    let out = simple(&["--json", "-"], "while 1 { }");
    assert_eq!(out.status.code(), Some(1));
    let json: serde_json::Value =
        serde_json::from_str(stderr(&out).trim()).expect("json on stderr");
    assert_eq!(json["kind"], "not_boolean");
    assert_eq!(json["file"], "<stdin>");
    assert_eq!(json["line"], 1);
    assert_eq!(json["column"], 7);
    assert_eq!(json["source_line"], "while 1 { }");
}

#[test]
fn max_steps_stops_infinite_loop() {
    let out = simple(&["--max-steps", "50", "-"], "while true { }");
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("step_limit_exceeded"), "{}", stderr(&out));
}

#[test]
fn debug_parse_prints_ast_to_stderr() {
    let out = simple(&["--debug-parse", "-"], "write(1);");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), "1\n");
    assert!(stderr(&out).contains("Program"), "{}", stderr(&out));
}

#[test]
fn missing_file_is_an_io_error() {
    let out = simple(&["definitely/not/here.ss"], "");
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).starts_with("error[io]:"), "{}", stderr(&out));
}
