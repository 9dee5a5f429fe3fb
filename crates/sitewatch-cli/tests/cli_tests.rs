use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn sitewatch() -> Command {
    Command::cargo_bin("sitewatch").unwrap()
}

#[test]
fn help_lists_the_overrides() {
    sitewatch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--base-url"))
        .stdout(predicate::str::contains("--mode"))
        .stdout(predicate::str::contains("--webdriver-url"));
}

#[test]
fn version_flag_works() {
    sitewatch()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sitewatch"));
}

#[test]
fn unparseable_config_is_a_startup_error() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("sitewatch.toml");
    std::fs::write(&config, "this is not toml = = =").unwrap();

    sitewatch()
        .arg("--config")
        .arg(&config)
        .arg("--base-url")
        .arg("http://localhost:4200")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load"));
}

#[test]
fn empty_rule_set_is_rejected_at_startup() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("sitewatch.toml");
    std::fs::write(&config, "rules = []\n").unwrap();

    sitewatch()
        .arg("--config")
        .arg(&config)
        .arg("--base-url")
        .arg("http://localhost:4200")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load"));
}
