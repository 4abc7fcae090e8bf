//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with an isolated `MISSIONROI_HOME` and
//! verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_missionroi"))
        .args(args)
        .env("MISSIONROI_HOME", home)
        .env_remove("MISSIONROI_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(home: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

fn add_abc(home: &Path) {
    run_ok(home, &["mission", "add", "Mission A", "--effort", "30", "--payoff", "90", "--id", "a"]);
    run_ok(home, &["mission", "add", "Mission B", "--effort", "60", "--payoff", "120", "--id", "b"]);
    run_ok(home, &["mission", "add", "Mission C", "--effort", "90", "--payoff", "90", "--id", "c"]);
}

#[test]
fn test_mission_add_and_list_json() {
    let home = tempfile::tempdir().unwrap();
    add_abc(home.path());

    let out = run_ok(home.path(), &["mission", "list", "--json"]);
    let missions: serde_json::Value = serde_json::from_str(&out).unwrap();
    let ids: Vec<&str> = missions
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["mission_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(missions[0]["status"], "QUEUED");
}

#[test]
fn test_duplicate_mission_fails() {
    let home = tempfile::tempdir().unwrap();
    add_abc(home.path());
    let (_, stderr, code) = run_cli(
        home.path(),
        &["mission", "add", "Again", "--effort", "10", "--payoff", "10", "--id", "a"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"), "stderr: {stderr}");
}

#[test]
fn test_prioritize_ranks_and_writes_signal() {
    let home = tempfile::tempdir().unwrap();
    add_abc(home.path());

    let out = run_ok(home.path(), &["prioritize", "--json", "--work-id", "w-1"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["fatigue_state"], "FRESH");
    assert_eq!(parsed["effective_capacity_minutes"], 480);
    assert_eq!(parsed["prioritization"]["priorities"][0]["mission_id"], "a");

    let stream = home.path().join("signals").join("mission_prioritization.jsonl");
    let content = std::fs::read_to_string(stream).unwrap();
    let signal: serde_json::Value = serde_json::from_str(content.lines().next().unwrap()).unwrap();
    assert_eq!(signal["queued_count"], 3);
    assert_eq!(signal["top_priority_rank_1"], "a");
    assert_eq!(signal["work_id"], "w-1");
}

#[test]
fn test_activate_pause_resume_flow() {
    let home = tempfile::tempdir().unwrap();
    add_abc(home.path());

    run_ok(home.path(), &["mission", "activate", "b"]);
    run_ok(home.path(), &["mission", "activate", "c"]);
    let summary: serde_json::Value =
        serde_json::from_str(&run_ok(home.path(), &["mission", "summary", "--json"])).unwrap();
    assert_eq!(summary["active_count"], 1);
    assert_eq!(summary["queued_count"], 2);

    run_ok(home.path(), &["mission", "pause", "a", "--reason", "blocked"]);
    let deferred: serde_json::Value =
        serde_json::from_str(&run_ok(home.path(), &["mission", "deferred", "--json"])).unwrap();
    assert_eq!(deferred[0]["mission_id"], "a");
    assert_eq!(deferred[0]["paused_reason"], "blocked");

    let (_, _, code) = run_cli(home.path(), &["mission", "activate", "a"]);
    assert_eq!(code, 1);

    run_ok(home.path(), &["mission", "resume", "a"]);
    let shown: serde_json::Value =
        serde_json::from_str(&run_ok(home.path(), &["mission", "show", "a", "--json"])).unwrap();
    assert_eq!(shown["status"], "QUEUED");
}

#[test]
fn test_budget_usage_drives_fatigue() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["budget", "use", "450"]);

    let budget: serde_json::Value =
        serde_json::from_str(&run_ok(home.path(), &["budget", "show", "--json"])).unwrap();
    assert_eq!(budget["used_minutes"], 450);
    assert_eq!(budget["remaining_minutes"], 30);

    let fatigue: serde_json::Value =
        serde_json::from_str(&run_ok(home.path(), &["fatigue", "--json"])).unwrap();
    assert_eq!(fatigue["state"], "EXHAUSTED");
    assert_eq!(fatigue["can_accept_new_mission"], false);

    run_ok(home.path(), &["budget", "reset"]);
    let fatigue: serde_json::Value =
        serde_json::from_str(&run_ok(home.path(), &["fatigue", "--json"])).unwrap();
    assert_eq!(fatigue["state"], "FRESH");
}

#[test]
fn test_budget_overspend_is_reported() {
    let home = tempfile::tempdir().unwrap();
    let out = run_ok(home.path(), &["budget", "use", "600"]);
    assert!(out.contains("Over budget by 120m"), "stdout: {out}");

    let budget: serde_json::Value =
        serde_json::from_str(&run_ok(home.path(), &["budget", "show", "--json"])).unwrap();
    assert_eq!(budget["overspent"], true);
    assert_eq!(budget["remaining_minutes"], -120);

    let (_, stderr, code) = run_cli(home.path(), &["budget", "use", "9223372036854775807"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("overflows"), "stderr: {stderr}");
}

#[test]
fn test_fatigue_with_explicit_numbers() {
    let home = tempfile::tempdir().unwrap();
    let fatigue: serde_json::Value = serde_json::from_str(&run_ok(
        home.path(),
        &["fatigue", "--used", "60", "--total", "100", "--json"],
    ))
    .unwrap();
    assert_eq!(fatigue["state"], "TIRED");
    assert_eq!(fatigue["capacity_multiplier"], 0.6);
}

#[test]
fn test_tradeoff_decision_and_signal() {
    let home = tempfile::tempdir().unwrap();
    let out = run_ok(
        home.path(),
        &[
            "tradeoff", "--name", "Automate deploys", "--value", "300", "--cost", "60",
            "--confidence", "0.9", "--risk", "0.1", "--json",
        ],
    );
    let score: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(score["decision"], "PROCEED");

    let stream = home.path().join("signals").join("economic_tradeoff.jsonl");
    let content = std::fs::read_to_string(stream).unwrap();
    let signal: serde_json::Value = serde_json::from_str(content.lines().next().unwrap()).unwrap();
    assert_eq!(signal["signal_type"], "economic_tradeoff");
    assert_eq!(signal["payload"]["decision"], "PROCEED");
}

#[test]
fn test_disabled_signals_write_nothing() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["config", "set", "signals.enabled", "false"]);
    run_ok(
        home.path(),
        &["tradeoff", "--name", "x", "--value", "100", "--cost", "10"],
    );
    assert!(!home.path().join("signals").exists());
}

#[test]
fn test_config_get_set() {
    let home = tempfile::tempdir().unwrap();
    assert_eq!(
        run_ok(home.path(), &["config", "get", "budget.daily_minutes"]).trim(),
        "480"
    );
    run_ok(home.path(), &["config", "set", "budget.daily_minutes", "300"]);
    assert_eq!(
        run_ok(home.path(), &["config", "get", "budget.daily_minutes"]).trim(),
        "300"
    );
    let (_, _, code) = run_cli(home.path(), &["config", "set", "budget.nope", "1"]);
    assert_eq!(code, 1);
    let path = run_ok(home.path(), &["config", "path"]);
    assert!(path.trim().ends_with("config.toml"));
}

#[test]
fn test_completions_generate() {
    let home = tempfile::tempdir().unwrap();
    let out = run_ok(home.path(), &["completions", "bash"]);
    assert!(out.contains("missionroi"));
}
