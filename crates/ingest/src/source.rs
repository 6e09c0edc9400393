use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use traffic_core::LogRecord;

use crate::types::{IngestError, IngestIssue, MalformedLines, Result};

/// Lower bound applied to record timestamps before they reach the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StartAt {
    Inclusive(f64),
    /// Records after `ts`, plus records at exactly `ts` once the first
    /// `already_read` of them have gone by.
    After { ts: f64, already_read: u64 },
}

impl Default for StartAt {
    fn default() -> Self {
        Self::Inclusive(0.0)
    }
}

enum Input {
    Path(PathBuf),
    Reader {
        name: String,
        reader: Box<dyn BufRead>,
    },
}

struct OpenInput {
    name: String,
    reader: Box<dyn BufRead>,
    line: u64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SourceStats {
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub lines_read: u64,
    pub bytes_read: u64,
    pub records_filtered: u64,
    pub malformed_lines: u64,
}

pub fn parse_log_line(line: &[u8]) -> serde_json::Result<LogRecord> {
    serde_json::from_slice(line)
}

/// Ordered stream of log records read from append-only inputs, one JSON
/// object per line. Inputs are read one after another in the order given.
pub struct LogSource {
    pending: VecDeque<Input>,
    current: Option<OpenInput>,
    start: StartAt,
    equal_seen: u64,
    malformed: MalformedLines,
    buf: Vec<u8>,
    stats: SourceStats,
    issues: Vec<IngestIssue>,
}

impl LogSource {
    pub fn new(start: StartAt, malformed: MalformedLines) -> Self {
        Self {
            pending: VecDeque::new(),
            current: None,
            start,
            equal_seen: 0,
            malformed,
            buf: Vec::new(),
            stats: SourceStats::default(),
            issues: Vec::new(),
        }
    }

    pub fn from_paths<I>(paths: I, start: StartAt, malformed: MalformedLines) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut source = Self::new(start, malformed);
        for path in paths {
            source.push_path(path);
        }
        source
    }

    pub fn push_path(&mut self, path: PathBuf) {
        self.pending.push_back(Input::Path(path));
    }

    pub fn push_reader(&mut self, name: impl Into<String>, reader: Box<dyn BufRead>) {
        self.pending.push_back(Input::Reader {
            name: name.into(),
            reader,
        });
    }

    pub fn stats(&self) -> SourceStats {
        self.stats
    }

    pub fn take_issues(&mut self) -> Vec<IngestIssue> {
        std::mem::take(&mut self.issues)
    }

    fn open_next(&mut self) -> Option<OpenInput> {
        while let Some(input) = self.pending.pop_front() {
            match input {
                Input::Path(path) => {
                    let name = path.to_string_lossy().to_string();
                    match File::open(&path) {
                        Ok(file) => {
                            self.stats.files_scanned += 1;
                            tracing::debug!(path = %name, "reading log file");
                            return Some(OpenInput {
                                name,
                                reader: Box::new(BufReader::new(file)),
                                line: 0,
                            });
                        }
                        Err(err) => {
                            tracing::warn!(path = %name, error = %err, "skipping unreadable log file");
                            self.stats.files_skipped += 1;
                            self.issues.push(IngestIssue {
                                file_path: name,
                                line: None,
                                message: err.to_string(),
                            });
                        }
                    }
                }
                Input::Reader { name, reader } => {
                    self.stats.files_scanned += 1;
                    return Some(OpenInput {
                        name,
                        reader,
                        line: 0,
                    });
                }
            }
        }
        None
    }

    fn admits(&mut self, ts: f64) -> bool {
        match self.start {
            StartAt::Inclusive(start) => ts >= start,
            StartAt::After { ts: start, .. } if ts > start => true,
            StartAt::After {
                ts: start,
                already_read,
            } if ts == start => {
                self.equal_seen += 1;
                self.equal_seen > already_read
            }
            StartAt::After { .. } => false,
        }
    }

    fn malformed_line(
        &mut self,
        file_path: String,
        line: u64,
        err: serde_json::Error,
    ) -> Option<Result<LogRecord>> {
        self.stats.malformed_lines += 1;
        match self.malformed {
            MalformedLines::Skip => {
                tracing::warn!(path = %file_path, line, error = %err, "skipping malformed log line");
                self.issues.push(IngestIssue {
                    file_path,
                    line: Some(line),
                    message: err.to_string(),
                });
                None
            }
            MalformedLines::Abort => Some(Err(IngestError::Parse {
                file_path,
                line,
                source: err,
            })),
        }
    }
}

impl Iterator for LogSource {
    type Item = Result<LogRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current.is_none() {
                self.current = Some(self.open_next()?);
            }
            let input = self.current.as_mut()?;
            self.buf.clear();
            let bytes = match input.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => {
                    self.current = None;
                    continue;
                }
                Ok(bytes) => bytes,
                Err(err) => {
                    self.current = None;
                    return Some(Err(IngestError::Io(err)));
                }
            };
            input.line += 1;
            let line_no = input.line;
            self.stats.lines_read += 1;
            self.stats.bytes_read += bytes as u64;

            let line = self.buf.trim_ascii();
            if line.is_empty() {
                continue;
            }
            let record = match parse_log_line(line) {
                Ok(record) => record,
                Err(err) => {
                    let file_path = input.name.clone();
                    match self.malformed_line(file_path, line_no, err) {
                        Some(result) => return Some(result),
                        None => continue,
                    }
                }
            };
            if !self.admits(record.ts) {
                self.stats.records_filtered += 1;
                continue;
            }
            return Some(Ok(record));
        }
    }
}
