mod common;

use common::{sheet_upload, WORLD_FILE};
use serde_json::Value;
use std::process::{Command, Output};
use tempfile::TempDir;

fn sheetcheck(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sheetcheck"))
        .args(args)
        .env_remove("SHEETCHECK_SHRINK_METERS")
        .env_remove("SHEETCHECK_SCRATCH_DIR")
        .env("RUST_LOG", "sheetcheck=debug")
        .output()
        .unwrap()
}

/// Stdout must be exactly one JSON document
fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_valid_upload_exits_zero() {
    let dir = TempDir::new().unwrap();
    let archive = sheet_upload(dir.path(), "upload-5f2c.zip", 3000, WORLD_FILE);

    let output = sheetcheck(&[archive.to_str().unwrap(), "16516_123456.zip"]);
    assert_eq!(output.status.code(), Some(0));

    let json = stdout_json(&output);
    assert_eq!(json["valid"], Value::Bool(true));
    assert_eq!(json["error"], Value::Null);
    assert_eq!(json["warning"], Value::Null);
    assert_eq!(json["filename_sheet_number"], "123456");
    assert_eq!(json["actual_sheet_number"], "123456");
}

#[test]
fn test_invalid_upload_exits_one() {
    let dir = TempDir::new().unwrap();
    let archive = sheet_upload(dir.path(), "16516_123456.zip", 2000, WORLD_FILE);

    let output = sheetcheck(&[archive.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));

    let json = stdout_json(&output);
    assert_eq!(json["valid"], Value::Bool(false));
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Image bounds do not contain expected map area for sheet 123456."));
}

#[test]
fn test_wrong_argument_count() {
    let usage = serde_json::json!({
        "error": "Usage: sheetcheck <zip_file_path> [original_filename]"
    });

    for args in [&[][..], &["a.zip", "b.zip", "c.zip"][..]] {
        let output = sheetcheck(args);
        assert_eq!(output.status.code(), Some(1));
        assert_eq!(stdout_json(&output), usage);
    }
}

#[test]
fn test_missing_archive() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("16516_123456.zip");

    let output = sheetcheck(&[missing.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout_json(&output),
        serde_json::json!({ "error": format!("File not found: {}", missing.display()) })
    );
}
