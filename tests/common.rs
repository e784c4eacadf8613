#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated home directory plus database for one test.
pub struct TestEnv {
    pub home: TempDir,
    pub db_path: String,
}

impl TestEnv {
    pub fn new() -> Self {
        let home = tempfile::tempdir().expect("temp dir");
        let db_path = home
            .path()
            .join("test_rfinishline.sqlite")
            .to_string_lossy()
            .to_string();
        Self { home, db_path }
    }

    /// Binary with the isolated home and `--db` already set.
    pub fn rfl(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("rfinishline");
        cmd.env("RFINISHLINE_HOME", self.home.path())
            .env("NO_COLOR", "1")
            .args(["--db", &self.db_path]);
        cmd
    }

    /// Run `init` in test mode.
    pub fn init(&self) -> &Self {
        self.rfl().args(["--test", "init"]).assert().success();
        self
    }

    pub fn out_path(&self, name: &str) -> PathBuf {
        self.home.path().join(name)
    }

    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.out_path(name);
        std::fs::write(&path, content).expect("write fixture");
        path
    }

    pub fn conn(&self) -> rusqlite::Connection {
        rusqlite::Connection::open(&self.db_path).expect("open db")
    }

    /// `(rank, elapsed, gap_leader, gap_prev)` of every record, by rank.
    pub fn placements(&self, event_id: i64) -> Vec<(i64, i64, i64, i64)> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT rank, elapsed_ms, gap_leader_ms, gap_prev_ms
                 FROM records WHERE event_id = ?1 ORDER BY rank",
            )
            .expect("prepare");
        stmt.query_map([event_id], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)))
            .expect("query")
            .map(|r| r.expect("row"))
            .collect()
    }

    pub fn count(&self, sql: &str) -> i64 {
        self.conn().query_row(sql, [], |r| r.get(0)).expect("count")
    }
}

pub fn path_str(p: &Path) -> &str {
    p.to_str().expect("utf-8 path")
}
