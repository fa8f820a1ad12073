use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("sdg").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("sdg"))
        .stdout(predicate::str::contains("series"));
}

#[test]
fn indicators_are_listed_offline() {
    let mut cmd = Command::cargo_bin("sdg").unwrap();
    cmd.arg("indicators");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("EN.ATM.CO2E.PC"))
        .stdout(predicate::str::contains("SDG 13"));
}

#[test]
fn indicators_as_csv_have_a_header() {
    let mut cmd = Command::cargo_bin("sdg").unwrap();
    cmd.args(["indicators", "--format", "csv"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("code,name,sdg,goal"))
        .stdout(predicate::str::contains("AG.LND.FRST.ZS"));
}

#[test]
fn reversed_years_are_rejected_before_fetching() {
    let mut cmd = Command::cargo_bin("sdg").unwrap();
    cmd.args([
        "--base-url",
        "http://127.0.0.1:9/v2",
        "series",
        "--country",
        "USA",
        "--indicator",
        "EN.ATM.CO2E.PC",
        "--from",
        "2020",
        "--to",
        "2010",
    ]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid --from/--to"));
}

// Live test (opt-in): cargo test --features online
#[cfg(feature = "online")]
#[test]
fn fetch_online_forest_area() {
    let mut cmd = Command::cargo_bin("sdg").unwrap();
    cmd.args([
        "series",
        "--country",
        "FRA",
        "--indicator",
        "AG.LND.FRST.ZS",
        "--from",
        "2015",
        "--to",
        "2020",
        "--stats",
        "--locale",
        "fr",
    ]);
    cmd.assert().success();
}
