//! JSONL session log.
//!
//! Records are sent over an unbounded channel to a tokio task that appends one
//! JSON object per line. The game loop never waits on disk I/O; a full disk or
//! bad path silently ends logging.

use std::path::PathBuf;
use std::time::Instant;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::GenerationStats;
use crate::types::EngineEvent;

/// One session log entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum SessionRecord {
    Generated {
        seed: u32,
        size: usize,
        colors: usize,
        solution_len: usize,
        candidates: u32,
        coverage_rejects: u32,
        stalled: u32,
        elapsed_ms: u64,
    },
    Event {
        event: EngineEvent,
    },
    GenerationFailed {
        seed: u32,
        size: usize,
        colors: usize,
        error: String,
    },
    ReplayStarted {
        total: usize,
    },
    ReplayFinished {
        steps: usize,
        solved: bool,
        aborted: bool,
    },
}

impl SessionRecord {
    pub fn generated(
        seed: u32,
        size: usize,
        colors: usize,
        solution_len: usize,
        stats: &GenerationStats,
    ) -> Self {
        SessionRecord::Generated {
            seed,
            size,
            colors,
            solution_len,
            candidates: stats.candidates,
            coverage_rejects: stats.coverage_rejects,
            stalled: stats.stalled,
            elapsed_ms: stats.elapsed.as_millis() as u64,
        }
    }
}

#[derive(Serialize)]
struct Line<'a> {
    t_ms: u64,
    #[serde(flatten)]
    record: &'a SessionRecord,
}

/// Handle to the background log writer. A disabled log drops every record.
#[derive(Debug)]
pub struct SessionLog {
    tx: Option<mpsc::UnboundedSender<SessionRecord>>,
    task: Option<JoinHandle<()>>,
}

impl SessionLog {
    pub fn disabled() -> Self {
        Self {
            tx: None,
            task: None,
        }
    }

    /// Start the writer task when a path is given. Must be called inside a
    /// tokio runtime.
    pub fn start(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::spawn(path),
            None => Self::disabled(),
        }
    }

    fn spawn(path: PathBuf) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<SessionRecord>();
        let task = tokio::spawn(async move {
            use tokio::fs::OpenOptions;
            use tokio::io::AsyncWriteExt;

            let mut file = match OpenOptions::new().create(true).append(true).open(&path).await {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("[samegame] session log {} unavailable: {}", path.display(), e);
                    return;
                }
            };

            let started = Instant::now();
            let mut buf: Vec<u8> = Vec::with_capacity(4096);

            while let Some(record) = rx.recv().await {
                buf.clear();
                let line = Line {
                    t_ms: started.elapsed().as_millis() as u64,
                    record: &record,
                };
                if serde_json::to_writer(&mut buf, &line).is_err() {
                    continue;
                }
                buf.push(b'\n');
                if file.write_all(&buf).await.is_err() {
                    break;
                }
            }

            let _ = file.flush().await;
        });

        Self {
            tx: Some(tx),
            task: Some(task),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    pub fn record(&self, record: SessionRecord) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(record);
        }
    }

    pub fn events(&self, events: &[EngineEvent]) {
        if self.tx.is_none() {
            return;
        }
        for event in events {
            self.record(SessionRecord::Event {
                event: event.clone(),
            });
        }
    }

    /// Close the channel and wait until every queued record is written.
    pub async fn close(mut self) {
        self.tx.take();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Coord, Outcome};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("samegame-{}-{}.jsonl", name, std::process::id()))
    }

    #[tokio::test]
    async fn records_are_appended_as_json_lines() {
        let path = temp_path("append");
        let _ = std::fs::remove_file(&path);

        let log = SessionLog::start(Some(path.clone()));
        assert!(log.is_enabled());
        log.record(SessionRecord::ReplayStarted { total: 3 });
        log.events(&[
            EngineEvent::TileHidden {
                coord: Coord::new(1, 0),
            },
            EngineEvent::OutcomeReached {
                outcome: Outcome::Won,
            },
        ]);
        log.close().await;

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        let _ = std::fs::remove_file(&path);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["record"], "replay_started");
        assert_eq!(lines[0]["total"], 3);
        assert!(lines[0]["t_ms"].is_u64());
        assert_eq!(lines[1]["record"], "event");
        assert_eq!(lines[1]["event"]["type"], "tile_hidden");
        assert_eq!(lines[2]["event"]["outcome"], "won");
    }

    #[tokio::test]
    async fn disabled_log_accepts_records() {
        let log = SessionLog::start(None);
        assert!(!log.is_enabled());
        log.record(SessionRecord::ReplayFinished {
            steps: 0,
            solved: false,
            aborted: true,
        });
        log.close().await;
    }
}
