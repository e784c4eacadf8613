use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{TestEnv, path_str};

fn env_with_event() -> TestEnv {
    let env = TestEnv::new();
    env.init();
    env.rfl().args(["event", "add", "Half marathon"]).assert().success();
    env
}

#[test]
fn test_three_finishers_ranks_and_gaps() {
    let env = env_with_event();

    for (ms, bib) in [("7260000", "2"), ("2:02:00", "3"), ("7200000", "1")] {
        env.rfl()
            .args(["time", "add", "1", "--elapsed", ms, "--bib", bib])
            .assert()
            .success();
    }

    assert_eq!(
        env.placements(1),
        vec![
            (1, 7_200_000, 0, 0),
            (2, 7_260_000, 60_000, 60_000),
            (3, 7_320_000, 120_000, 60_000),
        ]
    );

    env.rfl()
        .args(["time", "list", "1", "--order-by", "rank"])
        .assert()
        .success()
        .stdout(contains("02:00:00").and(contains("+00:01:00")).and(contains("+00:02:00")));
}

#[test]
fn test_delete_recomputes_ranks() {
    let env = env_with_event();
    for ms in ["1000", "2000", "3500"] {
        env.rfl()
            .args(["time", "add", "1", "--elapsed", ms])
            .assert()
            .success();
    }

    env.rfl().args(["time", "del", "1", "--yes"]).assert().success();

    assert_eq!(
        env.placements(1),
        vec![(1, 2_000, 0, 0), (2, 3_500, 1_500, 1_500)]
    );

    env.rfl()
        .args(["time", "del", "1", "--yes"])
        .assert()
        .failure()
        .stderr(contains("Record 1 not found"));
}

#[test]
fn test_list_is_idempotent_and_falls_back_on_unknown_order() {
    let env = env_with_event();
    for (ms, bib) in [("3000", "b"), ("1000", "a"), ("1000", "c")] {
        env.rfl()
            .args(["time", "add", "1", "--elapsed", ms, "--bib", bib])
            .assert()
            .success();
    }

    let run = || {
        env.rfl()
            .args(["time", "list", "1", "--order-by", "nonsense", "--order-dir", "sideways"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone()
    };
    let first = run();
    assert_eq!(first, run());

    let text = String::from_utf8(first).unwrap();
    let a = text.find(" a ").unwrap();
    let c = text.find(" c ").unwrap();
    let b = text.find(" b ").unwrap();
    assert!(a < c && c < b);
}

#[test]
fn test_search_matches_bib_or_note() {
    let env = env_with_event();
    env.rfl()
        .args(["time", "add", "1", "--elapsed", "1000", "--bib", "A-17"])
        .assert()
        .success();
    env.rfl()
        .args(["time", "add", "1", "--elapsed", "2000", "--bib", "99", "--note", "Lost shoe"])
        .assert()
        .success();

    env.rfl()
        .args(["time", "list", "1", "--search", "SHOE"])
        .assert()
        .success()
        .stdout(contains("Lost shoe").and(contains("A-17").not()));
}

#[test]
fn test_negative_and_malformed_elapsed_are_rejected() {
    let env = env_with_event();

    env.rfl()
        .args(["time", "add", "1", "--elapsed", "1:75"])
        .assert()
        .failure()
        .stderr(contains("Invalid time format"));

    env.rfl()
        .args(["time", "add", "1"])
        .assert()
        .failure()
        .stderr(contains("no start instant"));

    assert_eq!(env.count("SELECT COUNT(*) FROM records"), 0);
}

#[test]
fn test_elapsed_from_event_start() {
    let env = TestEnv::new();
    env.init();
    env.rfl()
        .args(["event", "add", "10k", "--start", "2025-05-04T09:00:00Z"])
        .assert()
        .success();

    env.rfl()
        .args(["time", "add", "1", "--at", "2025-05-04T09:41:30Z", "--bib", "5"])
        .assert()
        .success()
        .stdout(contains("00:41:30"));

    env.rfl()
        .args(["time", "add", "1", "--at", "2025-05-04T08:59:00Z"])
        .assert()
        .failure()
        .stderr(contains("elapsed time must be >= 0"));
}

#[test]
fn test_edit_changes_labels_only() {
    let env = env_with_event();
    env.rfl()
        .args(["time", "add", "1", "--elapsed", "5000", "--bib", "10", "--note", "x"])
        .assert()
        .success();

    env.rfl()
        .args(["time", "edit", "1", "--bib", "11", "--note", ""])
        .assert()
        .success();

    let (bib, note, elapsed): (String, Option<String>, i64) = env
        .conn()
        .query_row("SELECT bib, note, elapsed_ms FROM records WHERE id = 1", [], |r| {
            Ok((r.get(0)?, r.get(1)?, r.get(2)?))
        })
        .unwrap();
    assert_eq!(bib, "11");
    assert_eq!(note, None);
    assert_eq!(elapsed, 5_000);
}

#[test]
fn test_reset_then_stats_is_empty() {
    let env = env_with_event();
    for ms in ["1000", "2000"] {
        env.rfl()
            .args(["time", "add", "1", "--elapsed", ms])
            .assert()
            .success();
    }

    env.rfl()
        .args(["stats", "1", "--json"])
        .assert()
        .success()
        .stdout(contains("\"count\": 2").and(contains("\"median_ms\": 1500.0")));

    env.rfl()
        .args(["event", "reset", "1", "--yes"])
        .assert()
        .success()
        .stdout(contains("2 times deleted"));

    env.rfl()
        .args(["event", "show", "1"])
        .assert()
        .success()
        .stdout(contains("Half marathon"));

    env.rfl()
        .args(["stats", "1", "--json"])
        .assert()
        .success()
        .stdout(contains("\"count\": 0").and(contains("\"stddev_ms\": null")));
}

#[test]
fn test_bulk_import_is_all_or_nothing() {
    let env = env_with_event();

    let bad = env.write_file("bad.csv", "bib,elapsed\n1,1000\n2,oops\n");
    env.rfl()
        .args(["time", "bulk", "1", "--file", path_str(&bad)])
        .assert()
        .failure();
    assert_eq!(env.count("SELECT COUNT(*) FROM records"), 0);

    let good = env.write_file(
        "good.csv",
        "Pettorale,Tempo Millisecondi,Note\n21,7320000,\n22,7200000,sprint finish\n23,2:01:00,\n",
    );
    env.rfl()
        .args(["time", "bulk", "1", "--file", path_str(&good)])
        .assert()
        .success()
        .stdout(contains("3 times recorded"));

    assert_eq!(
        env.placements(1),
        vec![
            (1, 7_200_000, 0, 0),
            (2, 7_260_000, 60_000, 60_000),
            (3, 7_320_000, 120_000, 60_000),
        ]
    );
}

#[test]
fn test_closed_event_rejects_times() {
    let env = env_with_event();
    env.rfl()
        .args(["event", "edit", "1", "--status", "closed"])
        .assert()
        .success();

    env.rfl()
        .args(["time", "add", "1", "--elapsed", "1000"])
        .assert()
        .failure()
        .stderr(contains("closed"));
}

#[test]
fn test_list_accepts_camel_case_order_fields() {
    let env = env_with_event();
    for (ms, bib) in [("3000", "late"), ("1000", "early")] {
        env.rfl()
            .args(["time", "add", "1", "--elapsed", ms, "--bib", bib])
            .assert()
            .success();
    }

    let out = env
        .rfl()
        .args(["time", "list", "1", "--order-by", "createdAt"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(out).unwrap();
    assert!(text.find("late").unwrap() < text.find("early").unwrap());

    env.rfl()
        .args(["time", "list", "--help"])
        .assert()
        .success()
        .stdout(contains("createdAt").and(contains("elapsedMs")));
}
