use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::types::IngestIssue;

pub const LOG_PATHS_ENV: &str = "TRAFFIC_PARSER_LOGS";

pub fn default_log_paths() -> Vec<PathBuf> {
    if let Some(paths) = std::env::var_os(LOG_PATHS_ENV) {
        let paths = std::env::split_paths(&paths).collect::<Vec<_>>();
        if !paths.is_empty() {
            return paths;
        }
    }
    vec![PathBuf::from("logs").join("access.log")]
}

pub(crate) fn is_log_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|value| value.to_str()),
        Some("log") | Some("jsonl") | Some("ndjson")
    )
}

/// Expands directories into the log files they contain, in file-name order.
///
/// Plain file paths are kept as given, in the given order, so rotated logs
/// listed oldest first are read oldest first.
pub fn expand_log_paths(paths: &[PathBuf]) -> (Vec<PathBuf>, Vec<IngestIssue>) {
    let mut files = Vec::new();
    let mut issues = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        let walker = WalkDir::new(path)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let file_path = err
                        .path()
                        .map(|path| path.to_string_lossy().to_string())
                        .unwrap_or_else(|| "<unknown>".to_string());
                    issues.push(IngestIssue {
                        file_path,
                        line: None,
                        message: err.to_string(),
                    });
                    continue;
                }
            };
            if entry.file_type().is_file() && is_log_path(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }
    (files, issues)
}
