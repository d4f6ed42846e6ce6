//! Integration tests for the backlog CLI
//!
//! Every test points the binary at a throwaway state directory and config
//! path. Seeded indexes are stamped "now" so nothing reaches the network.

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    fn backlog(dir: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("backlog");
        cmd.env("BACKLOG_STATE_DIR", dir.path().join("state"))
            .env("BACKLOG_CONFIG", dir.path().join("config.toml"))
            .env_remove("BACKLOG_USER")
            .env("CI", "1");
        cmd
    }

    fn seed(dir: &TempDir, key: &str, contents: &str) {
        let state = dir.path().join("state");
        fs::create_dir_all(&state).unwrap();
        fs::write(state.join(format!("{}.json", key)), contents).unwrap();
    }

    /// Fresh index with one detailed scene and one label-only performer
    fn seed_fresh_cache(dir: &TempDir) {
        let now = chrono::Utc::now().to_rfc3339();
        seed(
            dir,
            "stashdb_backlog_index",
            &format!(
                r#"{{"scenes":{{"s1":["h1","title","studio"]}},"performers":{{"p1":["","split"]}},"lastUpdated":"{}"}}"#,
                now
            ),
        );
        seed(
            dir,
            "stashdb_backlog",
            &format!(
                r#"{{"scene/s1":{{"contentHash":"h1","lastUpdated":"{}","title":"New title","studio":["id9","Studio Nine"]}}}}"#,
                now
            ),
        );
    }

    fn file_exists(dir: &TempDir, key: &str) -> bool {
        dir.path().join("state").join(format!("{}.json", key)).exists()
    }

    #[test]
    fn help_displays() {
        let dir = TempDir::new().unwrap();
        backlog(&dir)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("pending-change cache for StashDB"));
    }

    #[test]
    fn version_displays() {
        let dir = TempDir::new().unwrap();
        backlog(&dir)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("backlog"));
    }

    #[test]
    fn config_path_honors_env() {
        let dir = TempDir::new().unwrap();
        backlog(&dir)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show_defaults() {
        let dir = TempDir::new().unwrap();
        backlog(&dir)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[source]"))
            .stdout(predicate::str::contains("peolic/stashdb_backlog_data"));
    }

    #[test]
    fn config_init_writes_file() {
        let dir = TempDir::new().unwrap();
        backlog(&dir).args(["config", "init"]).assert().success();
        assert!(dir.path().join("config.toml").exists());
    }

    #[test]
    fn report_on_empty_cache() {
        let dir = TempDir::new().unwrap();
        backlog(&dir)
            .args(["report", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"backend\": \"file\""));
    }

    #[test]
    fn status_unknown_before_first_fetch() {
        let dir = TempDir::new().unwrap();
        backlog(&dir)
            .args(["status", "scene", "s1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("unknown"));
    }

    #[test]
    fn status_reflects_seeded_cache() {
        let dir = TempDir::new().unwrap();
        seed_fresh_cache(&dir);

        backlog(&dir)
            .args(["status", "scene", "s1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("pending-with-detail"));
        backlog(&dir)
            .args(["status", "performer", "p1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("pending-no-detail"));
        backlog(&dir)
            .args(["status", "scene", "gone"])
            .assert()
            .success()
            .stdout(predicate::str::contains("absent-upstream"));
    }

    #[test]
    fn status_migrates_legacy_index() {
        let dir = TempDir::new().unwrap();
        seed(
            &dir,
            "stashdb_backlog_index",
            r#"{"scenes":{"s1":"title,details"},"performers":{}}"#,
        );

        backlog(&dir)
            .args(["status", "scene", "s1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("pending-no-detail"));
    }

    #[test]
    fn get_serves_fresh_cache() {
        let dir = TempDir::new().unwrap();
        seed_fresh_cache(&dir);

        backlog(&dir)
            .args(["get", "scene", "s1", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"title\": \"New title\""))
            .stdout(predicate::str::contains("\"contentHash\": \"h1\""));
    }

    #[test]
    fn get_label_only_performer() {
        let dir = TempDir::new().unwrap();
        seed_fresh_cache(&dir);

        backlog(&dir)
            .args(["get", "performer", "p1", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("split"));
    }

    #[test]
    fn get_record_without_changes() {
        let dir = TempDir::new().unwrap();
        seed_fresh_cache(&dir);

        backlog(&dir)
            .args(["get", "scene", "other", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("null"));
    }

    #[test]
    fn index_lists_fresh_entries() {
        let dir = TempDir::new().unwrap();
        seed_fresh_cache(&dir);

        backlog(&dir)
            .args(["index", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("scene/s1 title,studio"))
            .stdout(predicate::str::contains("performer/p1 split"));
    }

    #[test]
    fn corrupt_state_suggests_clear() {
        let dir = TempDir::new().unwrap();
        seed(&dir, "stashdb_backlog_index", "not json");

        backlog(&dir)
            .args(["status", "scene", "s1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Corrupt cache state"))
            .stderr(predicate::str::contains("backlog clear"));
    }

    #[test]
    fn clear_requires_maintainer() {
        let dir = TempDir::new().unwrap();
        seed_fresh_cache(&dir);

        backlog(&dir)
            .args(["clear", "--yes"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("restricted to maintainers"));
        assert!(file_exists(&dir, "stashdb_backlog_index"));
    }

    #[test]
    fn clear_as_maintainer() {
        let dir = TempDir::new().unwrap();
        seed_fresh_cache(&dir);

        backlog(&dir)
            .args(["clear", "--yes", "--user", "peolic"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Cache cleared"));
        assert!(!file_exists(&dir, "stashdb_backlog_index"));
        assert!(!file_exists(&dir, "stashdb_backlog"));
    }

    #[test]
    fn refetch_requires_maintainer() {
        let dir = TempDir::new().unwrap();
        backlog(&dir)
            .args(["refetch", "scene", "s1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("restricted to maintainers"));
    }

    #[test]
    fn invalid_kind_rejected() {
        let dir = TempDir::new().unwrap();
        backlog(&dir)
            .args(["status", "studio", "s1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown record kind"));
    }
}
