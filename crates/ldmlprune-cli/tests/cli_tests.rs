use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const IDENTITY_ONLY: &str = r#"<ldml><identity><language type="en"/></identity></ldml>"#;
const WITH_DATA: &str = r#"<ldml><identity><language type="fr"/></identity><localeDisplayNames><languages><language type="fr">French</language></languages></localeDisplayNames></ldml>"#;

#[test]
fn prunes_identity_only_files_silently() -> TestResult {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("a.xml"), IDENTITY_ONLY)?;
    fs::write(dir.path().join("b.xml"), WITH_DATA)?;

    Command::cargo_bin("ldmlprune")?
        .arg(dir.path())
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());

    assert!(!dir.path().join("a.xml").exists());
    assert_eq!(fs::read_to_string(dir.path().join("b.xml"))?, WITH_DATA);
    Ok(())
}

#[test]
fn empty_directory_succeeds() -> TestResult {
    let dir = tempfile::tempdir()?;

    Command::cargo_bin("ldmlprune")?
        .arg(dir.path())
        .assert()
        .success();
    Ok(())
}

#[test]
fn malformed_file_fails() -> TestResult {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("broken.xml"), "<ldml><identity>")?;

    Command::cargo_bin("ldmlprune")?
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse"))
        .stderr(predicate::str::contains("broken.xml"));

    assert!(dir.path().join("broken.xml").exists());
    Ok(())
}

#[test]
fn missing_directory_fails() -> TestResult {
    let dir = tempfile::tempdir()?;

    Command::cargo_bin("ldmlprune")?
        .arg(dir.path().join("missing"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to prune"));
    Ok(())
}

#[test]
fn directory_argument_is_required() -> TestResult {
    Command::cargo_bin("ldmlprune")?
        .assert()
        .failure()
        .stderr(predicate::str::contains("<DIR>"));
    Ok(())
}

#[test]
fn debug_logging_reports_deletions() -> TestResult {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("a.xml"), IDENTITY_ONLY)?;

    Command::cargo_bin("ldmlprune")?
        .arg(dir.path())
        .env("RUST_LOG", "debug")
        .assert()
        .success()
        .stderr(predicate::str::contains("deleted"));
    Ok(())
}
