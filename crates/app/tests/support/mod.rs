use std::fs;
use std::path::Path;

use tempfile::TempDir;
use traffic_app::{AppConfig, AppState};
use traffic_db::StorageBackend;

// 2024-03-10T00:00:00Z
pub const DAY_START: f64 = 1_710_028_800.0;
pub const DAY: f64 = 86_400.0;

pub fn log_line(ts: f64, uri: &str, user_agent: &str, status: u16) -> String {
    format!(
        r#"{{"ts":{ts},"status":{status},"duration":0.2,"request":{{"remote_addr":"10.1.1.1:4000","uri":"{uri}","headers":{{"User-Agent":["{user_agent}"]}}}}}}"#
    )
}

pub fn write_log(path: &Path, lines: &[String]) {
    let mut contents = lines.join("\n");
    contents.push('\n');
    fs::write(path, contents).expect("write log");
}

pub fn setup_state(storage: StorageBackend) -> (TempDir, AppState) {
    let dir = tempfile::tempdir().expect("temp dir");
    let log_path = dir.path().join("access.log");
    write_log(
        &log_path,
        &[
            log_line(DAY_START + 10.0, "/", "Googlebot/2.1", 200),
            log_line(DAY_START + 20.0, "/wp-login.php", "curl/8.4.0", 404),
            log_line(DAY_START + 30.0, "/blog/42", "Mozilla/5.0", 200),
            log_line(DAY_START + DAY + 5.0, "/blog/43", "Mozilla/5.0", 200),
            log_line(DAY_START + DAY + 6.0, "/static/app.css", "Mozilla/5.0", 200),
        ],
    );
    let config = AppConfig {
        data_dir: dir.path().join("data"),
        storage,
        log_paths: vec![log_path],
        ..AppConfig::default()
    };
    let state = AppState::new(config);
    state.initialize().expect("initialize");
    (dir, state)
}
