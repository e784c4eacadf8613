use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{TestEnv, path_str};

#[test]
fn test_bib_import_and_standings() {
    let env = TestEnv::new();
    env.init();
    env.rfl().args(["event", "add", "Cross"]).assert().success();

    let csv = env.write_file("iscritti.csv", "Numero,Nome\n1,x\n");
    env.rfl()
        .args(["bib", "import", "1", "--file", path_str(&csv)])
        .assert()
        .success()
        .stdout(contains("1 bib entries imported"));

    let csv = env.write_file(
        "athletes.csv",
        "BIB,Nome Atleta,Categoria\n101,Anna Rossi,F\n102,Marco Bianchi,M\n,Ghost,M\n",
    );
    env.rfl()
        .args(["bib", "import", "1", "--file", path_str(&csv)])
        .assert()
        .success()
        .stdout(contains("2 bib entries imported"));
    assert_eq!(env.count("SELECT COUNT(*) FROM bib_list"), 2);

    env.rfl()
        .args(["time", "add", "1", "--elapsed", "1:02:00", "--bib", "101"])
        .assert()
        .success();
    env.rfl()
        .args(["time", "add", "1", "--elapsed", "1:01:00", "--bib", "102"])
        .assert()
        .success();

    env.rfl()
        .args(["time", "standings", "1"])
        .assert()
        .success()
        .stdout(contains("Anna Rossi").and(contains("Marco Bianchi")));

    env.rfl()
        .args(["time", "standings", "1", "--category", "F"])
        .assert()
        .success()
        .stdout(contains("Anna Rossi").and(contains("Marco Bianchi").not()));
}

#[test]
fn test_bib_csv_without_bib_column_fails() {
    let env = TestEnv::new();
    env.init();
    env.rfl().args(["event", "add", "Cross"]).assert().success();

    let csv = env.write_file("bad.csv", "name,category\nAnna,F\n");
    env.rfl()
        .args(["bib", "import", "1", "--file", path_str(&csv)])
        .assert()
        .failure()
        .stderr(contains("no bib column"));
}

#[test]
fn test_bib_list_and_clear() {
    let env = TestEnv::new();
    env.init();
    env.rfl().args(["event", "add", "Cross"]).assert().success();
    env.rfl()
        .args(["bib", "set", "1", "5:Eva:F", "6"])
        .assert()
        .success();

    env.rfl()
        .args(["bib", "list", "1"])
        .assert()
        .success()
        .stdout(contains("Eva"));

    env.rfl()
        .args(["bib", "clear", "1", "--yes"])
        .assert()
        .success()
        .stdout(contains("2 bib entries deleted"));
}
