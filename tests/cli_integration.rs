//! Integration tests for the `tally` CLI.
//!
//! Each test seeds a store in a temp directory through the library, runs
//! `tally` as a subprocess against it with `--db`, and checks the output.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{Duration, Local, NaiveDate};
use tally::io::store::{Store, StoreOptions};
use tally::model::{Habit, HabitKind, Task};

/// Get the path to the built `tally` binary.
fn tally_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("tally");
    path
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Temp dir with an empty config and a store path inside it
struct Env {
    dir: tempfile::TempDir,
}

impl Env {
    fn new() -> Self {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), "[store]\nlock_timeout_ms = 50\n").unwrap();
        Env { dir }
    }

    fn db(&self) -> PathBuf {
        self.dir.path().join("tally.db")
    }

    fn open(&self) -> Store {
        Store::open(&self.db(), StoreOptions::default()).unwrap()
    }

    /// Seed habits "Read" (h1) and "Run" (h2); Read is done today
    fn seed_habits(&self) {
        let mut store = self.open();
        store
            .put_habit(&Habit::new("h1", "Read", HabitKind::General))
            .unwrap();
        store
            .put_habit(&Habit::new("h2", "Run", HabitKind::Daily))
            .unwrap();
        store.toggle_completion("h1", today()).unwrap();
        store.close().unwrap();
    }

    fn run(&self, args: &[&str]) -> (String, String, bool) {
        run_in(self.dir.path(), &self.db(), args)
    }

    fn run_ok(&self, args: &[&str]) -> String {
        let (stdout, stderr, success) = self.run(args);
        if !success {
            panic!(
                "tally {:?} failed:\nstdout: {}\nstderr: {}",
                args, stdout, stderr
            );
        }
        stdout
    }
}

fn run_in(dir: &Path, db: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(tally_bin())
        .arg("--db")
        .arg(db)
        .arg("--config")
        .arg(dir.join("config.toml"))
        .args(args)
        .current_dir(dir)
        .env_remove("TALLY_LOG")
        .output()
        .expect("failed to run tally");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[test]
fn test_habits_empty_store() {
    let env = Env::new();
    let out = env.run_ok(&["habits"]);
    assert!(out.contains("No habits yet."));
}

#[test]
fn test_habits_shows_today_state() {
    let env = Env::new();
    env.seed_habits();

    let out = env.run_ok(&["habits"]);
    assert!(out.contains("✓ Read"));
    assert!(out.contains("○ Run"));
    assert!(out.contains("Daily"));
}

#[test]
fn test_habits_archived_flag() {
    let env = Env::new();
    env.seed_habits();
    {
        let mut store = env.open();
        assert!(store.delete_habit("h2").unwrap());
    }

    let out = env.run_ok(&["habits"]);
    assert!(!out.contains("Run"));

    let out = env.run_ok(&["habits", "--archived"]);
    assert!(out.contains("Run"));
    assert!(out.contains("[archived]"));
}

#[test]
fn test_habits_json() {
    let env = Env::new();
    env.seed_habits();

    let out = env.run_ok(&["--json", "habits"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"], "h1");
    assert_eq!(list[0]["done_today"], true);
    assert_eq!(list[1]["kind"], "daily");
}

#[test]
fn test_tasks_listing() {
    let env = Env::new();
    {
        let mut store = env.open();
        let mut task = Task::new("t1", "Groceries");
        task.due_date = Some(today() - Duration::days(1));
        store.put_task(&task).unwrap();
        let mut done = Task::new("t2", "Taxes");
        done.completed = true;
        done.created_at = task.created_at + Duration::seconds(1);
        store.put_task(&done).unwrap();
    }

    let out = env.run_ok(&["tasks"]);
    assert!(out.contains("○ Groceries"));
    assert!(out.contains("(overdue)"));
    assert!(out.contains("✓ Taxes"));

    let out = env.run_ok(&["tasks", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json[0]["overdue"], true);
    assert_eq!(json[1]["completed"], true);
}

#[test]
fn test_stats_json() {
    let env = Env::new();
    env.seed_habits();
    {
        let mut store = env.open();
        for back in 1..=3 {
            store
                .toggle_completion("h1", today() - Duration::days(back))
                .unwrap();
        }
    }

    let out = env.run_ok(&["stats", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["habits"][0]["name"], "Read");
    assert_eq!(json["habits"][0]["current"], 4);
    assert_eq!(json["habits"][0]["longest"], 4);
    assert_eq!(json["habits"][1]["current"], 0);

    let out = env.run_ok(&["stats"]);
    assert!(out.contains("current   4  best   4"));
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

#[test]
fn test_done_toggles_by_name() {
    let env = Env::new();
    env.seed_habits();

    let out = env.run_ok(&["done", "run"]);
    assert!(out.starts_with("Run: done on "));
    assert!(env.open().is_completed("h2", today()).unwrap());

    let out = env.run_ok(&["done", "h2"]);
    assert!(out.starts_with("Run: not done on "));
    assert!(!env.open().is_completed("h2", today()).unwrap());
}

#[test]
fn test_done_with_date() {
    let env = Env::new();
    env.seed_habits();

    let out = env.run_ok(&["done", "Read", "--date", "2025-01-02"]);
    assert_eq!(out.trim(), "Read: done on 2025-01-02");
    let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
    assert!(env.open().is_completed("h1", date).unwrap());
}

#[test]
fn test_done_errors() {
    let env = Env::new();
    env.seed_habits();

    let (_, stderr, success) = env.run(&["done", "swim"]);
    assert!(!success);
    assert!(stderr.contains("error: no habit named 'swim'"));

    let (_, stderr, success) = env.run(&["done", "Read", "--date", "tomorrow"]);
    assert!(!success);
    assert!(stderr.contains("invalid date"));
}

// ---------------------------------------------------------------------------
// Startup failures
// ---------------------------------------------------------------------------

#[test]
fn test_second_instance_fails_fast() {
    let env = Env::new();
    let _held = env.open();

    let (_, stderr, success) = env.run(&["habits"]);
    assert!(!success);
    assert!(stderr.contains("already in use"));
}

#[test]
fn test_bad_config_is_fatal() {
    let env = Env::new();
    fs::write(env.dir.path().join("config.toml"), "[store\n").unwrap();

    let (_, stderr, success) = env.run(&["habits"]);
    assert!(!success);
    assert!(stderr.starts_with("error: invalid config"));
}
