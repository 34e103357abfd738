//! Integration tests for the pdf-fixtures CLI
//!
//! Runs the built binary against temporary directories and checks the files
//! it writes and the lines it prints.

use anyhow::Result;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

const ALL_FILES: [&str; 7] = [
    "xref-stream.pdf",
    "linearized.pdf",
    "compressed-object-stream.pdf",
    "flatedecode.pdf",
    "annotation-text.pdf",
    "bad-xref.pdf",
    "issue3115.pdf",
];

fn get_cli_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_pdf-fixtures"))
}

fn setup_temp_dir() -> TempDir {
    tempdir().expect("Failed to create temp directory")
}

fn run_cli_command(args: &[&str]) -> Result<std::process::Output> {
    let output = Command::new(get_cli_path()).args(args).output()?;
    Ok(output)
}

fn assert_pdf_exists_and_valid(path: &Path) {
    assert!(path.exists(), "PDF file should exist: {}", path.display());
    let content = fs::read(path).expect("Failed to read PDF file");
    assert!(
        content.starts_with(b"%PDF-1."),
        "File should start with PDF header"
    );
    assert!(content.ends_with(b"%%EOF\n"), "File should end with %%EOF");
}

#[test]
fn test_generate_all_fixtures() {
    let temp_dir = setup_temp_dir();
    let out = temp_dir.path().join("fixtures");

    let output = run_cli_command(&["generate", "--output", out.to_str().unwrap()])
        .expect("CLI command should run");
    assert!(output.status.success(), "Command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), ALL_FILES.len());

    for (line, name) in lines.iter().zip(ALL_FILES) {
        let path = out.join(name);
        assert_pdf_exists_and_valid(&path);

        let size = fs::metadata(&path).unwrap().len();
        assert_eq!(
            *line,
            format!("Generated: {} ({} bytes)", path.display(), size)
        );
    }
}

#[test]
fn test_generate_selected_fixture() {
    let temp_dir = setup_temp_dir();
    let out = temp_dir.path();

    let output = run_cli_command(&[
        "generate",
        "-o",
        out.to_str().unwrap(),
        "--fixture",
        "bad-xref",
        "--fixture",
        "issue3115.pdf",
        "--fixture",
        "bad-xref",
    ])
    .expect("CLI command should run");
    assert!(output.status.success());

    let mut written: Vec<String> = fs::read_dir(out)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    written.sort();
    assert_eq!(written, vec!["bad-xref.pdf", "issue3115.pdf"]);
    assert_eq!(String::from_utf8_lossy(&output.stdout).lines().count(), 2);
}

#[test]
fn test_generated_files_match_library_output() {
    let temp_dir = setup_temp_dir();
    let out = temp_dir.path();

    let output = run_cli_command(&["generate", "-o", out.to_str().unwrap()])
        .expect("CLI command should run");
    assert!(output.status.success());

    for kind in pdf_fixtures::FixtureKind::ALL {
        let on_disk = fs::read(out.join(kind.file_name())).unwrap();
        assert_eq!(on_disk, kind.build().unwrap(), "{kind}");
    }
}

#[test]
fn test_binary_marker_flag() {
    let temp_dir = setup_temp_dir();
    let out = temp_dir.path();

    let output = run_cli_command(&[
        "generate",
        "-o",
        out.to_str().unwrap(),
        "-f",
        "flatedecode",
        "--binary-marker",
    ])
    .expect("CLI command should run");
    assert!(output.status.success());

    let content = fs::read(out.join("flatedecode.pdf")).unwrap();
    assert!(content.starts_with(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n"));
}

#[test]
fn test_unknown_fixture_is_rejected() {
    let temp_dir = setup_temp_dir();
    let out = temp_dir.path().join("never-created");

    let output = run_cli_command(&[
        "generate",
        "-o",
        out.to_str().unwrap(),
        "--fixture",
        "no-such-fixture",
    ])
    .expect("CLI command should run");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no-such-fixture"));
    assert!(!out.exists());
}

#[test]
fn test_compression_level_out_of_range() {
    let output = run_cli_command(&["generate", "--compression-level", "12"])
        .expect("CLI command should run");
    assert!(!output.status.success());
}

#[test]
fn test_list_command() {
    let output = run_cli_command(&["list"]).expect("CLI command should run");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), ALL_FILES.len());
    for name in ALL_FILES {
        assert!(stdout.contains(name), "missing {name}");
    }
}

#[test]
fn test_help_lists_subcommands() {
    let output = run_cli_command(&["--help"]).expect("CLI command should run");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("generate"));
    assert!(stdout.contains("list"));
}
