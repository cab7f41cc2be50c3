use assert_cmd::Command;
use flate2::write::GzEncoder;
use flate2::Compression;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use tempfile::TempDir;

fn lgrep() -> Command {
    Command::cargo_bin("lgrep").unwrap()
}

const VULTURE: &str = r#"{"message": {"asctime": "2020-05-03 11:10:12,112", "request_id": "aaa", "practice_id": 17, "message": "a vulture circles"}}"#;
const CAPTAIN: &str = r#"{"message": {"asctime": "2020-05-03 13:10:12,112", "request_id": "687449ef-4c93-863c-03a503a227fc", "practice_id": 1204712973, "message": "captain america"}}"#;

#[test]
fn plain_search_orders_lines_by_text() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("words.txt"), "beta\nalpha\n")?;

    lgrep()
        .arg("a")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::eq("alpha\nbeta\n"));

    Ok(())
}

#[test]
fn structured_search_orders_records_by_asctime() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("a.log"), format!("{CAPTAIN}\n"))?;
    fs::write(temp_dir.path().join("b.log"), format!("{VULTURE}\n"))?;

    let assert = lgrep()
        .arg("captain|vulture")
        .arg(temp_dir.path())
        .arg("--json")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("vulture"));
    assert!(lines[1].contains("captain"));

    Ok(())
}

#[test]
fn absent_practice_id_filter_finds_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("a.log"), format!("{CAPTAIN}\n{VULTURE}\n"))?;

    lgrep()
        .arg("captain|vulture")
        .arg(temp_dir.path())
        .arg("--json")
        .arg("--practice-id")
        .arg("999")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No matches found"));

    Ok(())
}

#[test]
fn matching_request_id_filter_selects_one_record() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("a.log"), format!("{CAPTAIN}\n{VULTURE}\n"))?;

    lgrep()
        .arg(".")
        .arg(temp_dir.path())
        .arg("--json")
        .arg("--request-id")
        .arg("687449ef-4c93-863c-03a503a227fc")
        .assert()
        .success()
        .stdout(predicate::str::contains("captain").and(predicate::str::contains("vulture").not()));

    Ok(())
}

#[test]
fn gzipped_file_is_searched_by_content_sniffing() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(format!("{VULTURE}\n").as_bytes())?;
    // rotated log without a .gz suffix
    fs::write(temp_dir.path().join("app.log.1"), encoder.finish()?)?;

    lgrep()
        .arg("vulture")
        .arg(temp_dir.path())
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("vulture circles"));

    Ok(())
}

#[test]
fn filter_without_json_is_a_configuration_error() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;

    lgrep()
        .arg("captain")
        .arg(temp_dir.path())
        .arg("--practice-id")
        .arg("7")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--json"));

    Ok(())
}

#[test]
fn empty_pattern_is_a_configuration_error() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;

    lgrep()
        .arg("")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("non-empty"));

    Ok(())
}

#[test]
fn invalid_regex_is_rejected_before_scanning() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;

    lgrep()
        .arg("([unclosed")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Regex error"));

    Ok(())
}

#[test]
fn repeated_runs_are_byte_identical() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("a.log"), format!("{CAPTAIN}\n{VULTURE}\n"))?;
    fs::create_dir(temp_dir.path().join("sub"))?;
    fs::write(temp_dir.path().join("sub/b.log"), format!("{VULTURE}\n"))?;

    let output = |temp_dir: &TempDir| {
        let assert = lgrep()
            .arg("captain|vulture")
            .arg(temp_dir.path())
            .arg("--json")
            .assert()
            .success();
        assert.get_output().stdout.clone()
    };

    assert_eq!(output(&temp_dir), output(&temp_dir));

    Ok(())
}
