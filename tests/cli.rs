//! End-to-end tests for the `zinflate` binary.

#![cfg(feature = "cli")]

mod support;

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use support::corpus;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_zinflate"))
}

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("zinflate-cli-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir.join(name)
}

fn run_with_stdin(args: &[&str], input: &[u8]) -> Output {
    run_with_env(args, input, None)
}

fn run_with_env(args: &[&str], input: &[u8], rust_log: Option<&str>) -> Output {
    let mut command = bin();
    match rust_log {
        Some(filter) => command.env("RUST_LOG", filter),
        None => command.env_remove("RUST_LOG"),
    };
    let mut child = command
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn zinflate");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(input)
        .expect("write stdin");
    child.wait_with_output().expect("wait zinflate")
}

#[test]
fn test_cli_gzip_to_file() {
    let input = corpus::text(20_000, 1);
    let src = scratch("text.gz");
    let dst = scratch("text.out");
    fs::write(&src, corpus::gzip(&input, 6)).unwrap();

    let status = bin()
        .arg(&src)
        .arg("-o")
        .arg(&dst)
        .status()
        .expect("run zinflate");
    assert!(status.success());
    assert_eq!(fs::read(&dst).unwrap(), input);
}

#[test]
fn test_cli_stdin_to_stdout() {
    let input = corpus::runs(5000, 2);
    let output = run_with_stdin(&["-"], &corpus::zlib(&input, 9));
    assert!(output.status.success());
    assert_eq!(output.stdout, input);
}

#[test]
fn test_cli_raw_deflate_needs_format() {
    let input = corpus::text(1000, 3);
    let raw = corpus::deflate(&input, 6);

    let detected = run_with_stdin(&["-"], &raw);
    assert!(!detected.status.success());

    let forced = run_with_stdin(&["--format", "deflate", "-"], &raw);
    assert!(forced.status.success());
    assert_eq!(forced.stdout, input);
}

#[test]
fn test_cli_max_size() {
    let gz = corpus::gzip(&vec![0u8; 100_000], 9);
    let output = run_with_stdin(&["--max-size", "1000", "-"], &gz);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"), "stderr: {stderr}");
}

#[test]
fn test_cli_no_verify() {
    let input = corpus::text(800, 4);
    let mut gz = corpus::gzip(&input, 6);
    let crc_at = gz.len() - 8;
    gz[crc_at] ^= 0xFF;

    assert!(!run_with_stdin(&["-"], &gz).status.success());
    let lenient = run_with_stdin(&["--no-verify", "-"], &gz);
    assert!(lenient.status.success());
    assert_eq!(lenient.stdout, input);
}

#[test]
fn test_cli_list_members() {
    let mut gz = corpus::gzip_named(b"first", "one.txt", "");
    gz.extend_from_slice(&corpus::gzip_named(b"second member", "two.txt", ""));

    let output = run_with_stdin(&["--list", "-"], &gz);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3, "stdout: {stdout}");
    assert!(lines[1].ends_with("one.txt"));
    assert!(lines[2].contains(" 13 "));
    assert!(lines[2].ends_with("two.txt"));
}

#[test]
fn test_cli_verbosity_levels() {
    let gz = corpus::gzip(&corpus::text(2000, 5), 6);

    let quiet = run_with_env(&["-"], &gz, None);
    assert!(quiet.status.success());
    assert!(quiet.stderr.is_empty());

    let info = run_with_env(&["-v", "-"], &gz, None);
    let stderr = String::from_utf8_lossy(&info.stderr);
    assert!(stderr.contains("INFO"), "stderr: {stderr}");
    assert!(!stderr.contains("gzip member at"), "stderr: {stderr}");

    let debug = run_with_env(&["-vv", "-"], &gz, None);
    let stderr = String::from_utf8_lossy(&debug.stderr);
    assert!(stderr.contains("gzip member at 0"), "stderr: {stderr}");
    assert!(stderr.contains("inflate:"), "stderr: {stderr}");
}

#[test]
fn test_cli_rust_log_without_flags() {
    let gz = corpus::gzip(b"payload", 6);
    let output = run_with_env(&["-"], &gz, Some("debug"));
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("gzip member at 0"), "stderr: {stderr}");
}
