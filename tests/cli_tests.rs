//! Tests for the `antdb` command-line tool.

#[cfg(test)]
mod cli_tests {
    use assert_cmd::Command;
    use rusqlite::Connection;
    use std::fs;
    use tempfile::TempDir;

    /// Writes a seeded database and a config pointing at it.
    fn setup(dir: &TempDir, fetch_style: &str) -> std::path::PathBuf {
        let db_path = dir.path().join("app.db");
        let conn = Connection::open(&db_path).unwrap();
        conn.execute_batch(
            "
            CREATE TABLE users (id INTEGER PRIMARY KEY, username TEXT);
            INSERT INTO users (username) VALUES ('steve'), ('nancy');
        ",
        )
        .unwrap();

        let config_path = dir.path().join("antdb.toml");
        fs::write(
            &config_path,
            format!(
                "name = {:?}\n\n[options]\nfetch_style = \"{}\"\n",
                db_path.to_string_lossy(),
                fetch_style
            ),
        )
        .unwrap();
        config_path
    }

    #[test]
    fn test_select_prints_json_rows() {
        let dir = TempDir::new().unwrap();
        let config = setup(&dir, "object");

        let output = Command::cargo_bin("antdb")
            .unwrap()
            .arg(&config)
            .arg("SELECT id, username FROM users WHERE username = ?")
            .arg("nancy")
            .output()
            .unwrap();

        assert!(output.status.success());
        let stdout = String::from_utf8(output.stdout).unwrap();
        let row: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
        assert_eq!(row, serde_json::json!({"id": 2, "username": "nancy"}));
    }

    #[test]
    fn test_num_fetch_style_prints_arrays() {
        let dir = TempDir::new().unwrap();
        let config = setup(&dir, "num");

        let output = Command::cargo_bin("antdb")
            .unwrap()
            .arg(&config)
            .arg("SELECT id, username FROM users ORDER BY id")
            .output()
            .unwrap();

        assert!(output.status.success());
        let stdout = String::from_utf8(output.stdout).unwrap();
        let lines: Vec<&str> = stdout.lines().collect();
        assert_eq!(lines, vec![r#"[1,"steve"]"#, r#"[2,"nancy"]"#]);
    }

    #[test]
    fn test_write_reports_affected_rows() {
        let dir = TempDir::new().unwrap();
        let config = setup(&dir, "object");

        let output = Command::cargo_bin("antdb")
            .unwrap()
            .arg(&config)
            .arg("DELETE FROM users WHERE username = ?")
            .arg("steve")
            .output()
            .unwrap();

        assert!(output.status.success());
        assert_eq!(
            String::from_utf8(output.stdout).unwrap().trim(),
            "1 row(s) affected"
        );
    }

    #[test]
    fn test_failure_prints_error_log() {
        let dir = TempDir::new().unwrap();
        let config = setup(&dir, "object");

        let output = Command::cargo_bin("antdb")
            .unwrap()
            .arg(&config)
            .arg("SELECT * FROM missing")
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8(output.stderr).unwrap();
        assert!(stderr.contains("1 : no such table: missing"), "stderr: {}", stderr);
    }

    #[test]
    fn test_missing_arguments_print_usage() {
        let output = Command::cargo_bin("antdb").unwrap().output().unwrap();
        assert_eq!(output.status.code(), Some(2));
        assert!(String::from_utf8(output.stderr).unwrap().contains("usage"));
    }
}
