use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::TestEnv;

#[test]
fn test_init_creates_schema_without_config_file() {
    let env = TestEnv::new();
    env.init();

    assert!(std::path::Path::new(&env.db_path).exists());
    assert!(!env.out_path("rfinishline.conf").exists());
    assert_eq!(
        env.count("SELECT COUNT(*) FROM log WHERE operation = 'migration_applied'"),
        3
    );
}

#[test]
fn test_event_add_list_show() {
    let env = TestEnv::new();
    env.init();

    env.rfl()
        .args(["event", "add", "Trail 10k", "--start", "2025-05-04T09:00:00Z", "--note", "muddy"])
        .assert()
        .success()
        .stdout(contains("Event #1 'Trail 10k' created"));

    env.rfl()
        .args(["event", "list"])
        .assert()
        .success()
        .stdout(contains("Trail 10k").and(contains("active")));

    env.rfl()
        .args(["event", "show", "1"])
        .assert()
        .success()
        .stdout(contains("2025-05-04 09:00:00").and(contains("muddy")));
}

#[test]
fn test_sixth_event_evicts_oldest() {
    let env = TestEnv::new();
    env.init();

    for i in 1..=6 {
        env.rfl()
            .args(["event", "add", &format!("Race {i}")])
            .assert()
            .success();
    }

    assert_eq!(env.count("SELECT COUNT(*) FROM events"), 5);
    assert_eq!(env.count("SELECT MIN(id) FROM events"), 2);

    env.rfl()
        .args(["event", "show", "1"])
        .assert()
        .failure()
        .stderr(contains("Event 1 not found"));
}

#[test]
fn test_delete_cascades_then_not_found() {
    let env = TestEnv::new();
    env.init();

    env.rfl().args(["event", "add", "Sprint"]).assert().success();
    env.rfl()
        .args(["time", "add", "1", "--elapsed", "9580", "--bib", "7"])
        .assert()
        .success();
    env.rfl()
        .args(["bib", "set", "1", "7:Usain:M"])
        .assert()
        .success();

    env.rfl()
        .args(["event", "del", "1", "--yes"])
        .assert()
        .success()
        .stdout(contains("Event #1 deleted"));

    assert_eq!(env.count("SELECT COUNT(*) FROM records"), 0);
    assert_eq!(env.count("SELECT COUNT(*) FROM bib_list"), 0);

    env.rfl()
        .args(["time", "list", "1"])
        .assert()
        .failure()
        .stderr(contains("Event 1 not found"));
}

#[test]
fn test_delete_without_confirmation_is_cancelled() {
    let env = TestEnv::new();
    env.init();
    env.rfl().args(["event", "add", "Sprint"]).assert().success();

    env.rfl()
        .args(["event", "del", "1"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Cancelled"));

    assert_eq!(env.count("SELECT COUNT(*) FROM events"), 1);
}

#[test]
fn test_event_edit_status_and_invalid_status() {
    let env = TestEnv::new();
    env.init();
    env.rfl().args(["event", "add", "Relay"]).assert().success();

    env.rfl()
        .args(["event", "edit", "1", "--status", "CLOSED", "--name", "Relay 4x100"])
        .assert()
        .success();

    env.rfl()
        .args(["event", "show", "1"])
        .assert()
        .success()
        .stdout(contains("Relay 4x100").and(contains("closed")));

    env.rfl()
        .args(["event", "edit", "1", "--status", "paused"])
        .assert()
        .failure()
        .stderr(contains("Invalid event status"));
}

#[test]
fn test_empty_event_name_is_rejected() {
    let env = TestEnv::new();
    env.init();

    env.rfl()
        .args(["event", "add", "   "])
        .assert()
        .failure()
        .stderr(contains("Validation error"));
}
