use std::fs;

use tempfile::tempdir;

#[test]
fn test_cli_writes_daily_report() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("parameters.json");
    fs::write(
        &config,
        r#"{
            "grid": { "width": 9, "height": 9, "neighborhood": "moore", "contagion_radius": 1 },
            "population": { "strategy": "uniform", "infection_fraction": 0.0, "resistance": 1.0 }
        }"#,
    )
    .unwrap();
    let output = dir.path().join("reports").join("statistics.csv");

    assert_cmd::Command::cargo_bin("epigrid")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .arg("--output")
        .arg(&output)
        .arg("--log-level")
        .arg("off")
        .assert()
        .success()
        .stdout("Infections: 0\nDeaths: 0\nRemoved: 81\n");

    let report = fs::read_to_string(output).unwrap();
    assert_eq!(
        report,
        "day,infections,deaths,removed\n1,0,0,0\n2,0,0,0\n3,0,0,0\n"
    );
}

#[test]
fn test_cli_logs_each_day() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("statistics.csv");

    let result = assert_cmd::Command::cargo_bin("epigrid")
        .unwrap()
        .args(["--random-seed", "7", "--max-days", "2", "--log-level", "info"])
        .arg("--output")
        .arg(&output)
        .output()
        .unwrap();
    assert!(result.status.success());

    let stdout = String::from_utf8(result.stdout).unwrap();
    assert!(stdout.contains("Initial infections:"));
    assert!(stdout.contains("Day 1: infections"));
    assert!(stdout.contains("Day 2: infections"));
    assert!(!stdout.contains("Day 3: infections"));
    assert_eq!(fs::read_to_string(output).unwrap().lines().count(), 3);
}

#[test]
fn test_cli_rejects_bad_log_level() {
    let dir = tempdir().unwrap();
    assert_cmd::Command::cargo_bin("epigrid")
        .unwrap()
        .arg("--output")
        .arg(dir.path().join("statistics.csv"))
        .args(["--log-level", "chatty"])
        .assert()
        .failure();
}
