//! End-to-end CLI tests: spawn the real binary with `assert_cmd`, assert on
//! stdout/stderr/exit code with `predicates`, and use `tempfile` for
//! scratch input/output paths.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn bfpp() -> Command {
    Command::cargo_bin("bfppc").unwrap()
}

#[test]
fn compiles_a_minimal_program_to_assembly() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("main.bfpp");
    let output = dir.path().join("main.s");
    fs::write(&input, "@main: void +++ .").unwrap();

    bfpp()
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let asm = fs::read_to_string(&output).unwrap();
    assert!(asm.contains(".globl main"));
    assert!(asm.contains("main:"));
    assert!(asm.contains("syscall"));
}

#[test]
fn strips_line_comments_before_compiling() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("main.bfpp");
    let output = dir.path().join("main.s");
    fs::write(&input, "@main: void +++ ; bump the cell\n.").unwrap();

    bfpp().arg(&input).arg("-o").arg(&output).assert().success();

    let asm = fs::read_to_string(&output).unwrap();
    assert!(asm.contains("addb $3, (%rbp)"));
}

#[test]
fn no_input_file_reports_expected_error() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("main.s");

    bfpp()
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("bf++: error: no input files"));
}

#[test]
fn missing_output_reports_expected_error() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("main.bfpp");
    fs::write(&input, "@main: void +").unwrap();

    bfpp()
        .arg(&input)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("bf++: error: Unknown file extension"));
}

#[test]
fn unknown_output_extension_is_rejected() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("main.bfpp");
    let output = dir.path().join("main.exe");
    fs::write(&input, "@main: void +").unwrap();

    bfpp()
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unknown file extension"));
}

#[test]
fn missing_assembler_is_reported() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("main.bfpp");
    let output = dir.path().join("main.o");
    fs::write(&input, "@main: void +").unwrap();

    bfpp()
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("-a")
        .arg("__bfppc_definitely_not_a_real_tool__")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn output_extension_case_is_normalized() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("main.bfpp");
    let output = dir.path().join("main.S");
    fs::write(&input, "@main: void +").unwrap();

    bfpp().arg(&input).arg("-o").arg(&output).assert().success();

    assert!(dir.path().join("main.s").exists());
}
