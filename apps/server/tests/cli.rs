use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn missing_config_exits_non_zero() {
    let tmp = tempfile::tempdir().expect("tempdir");

    Command::cargo_bin("dynast-server")
        .expect("binary built")
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration is malformed"));
}
