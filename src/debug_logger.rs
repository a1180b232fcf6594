// Debug logging module for asynchronous decision logging
//
// Fire-and-forget writes keep file I/O off the request path. Each decision is
// one JSON line carrying everything the replay tool needs to re-run it.

use log::{error, info};
use serde::Serialize;
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::types::{Board, Direction};

/// Represents a single debug log entry
#[derive(Debug, Serialize)]
struct DebugLogEntry {
    turn: i32,
    you_id: String,
    ruleset: String,
    chosen_move: String,
    board: Board,
    timestamp: String,
}

/// Shared debug logger state
/// Cloned into every writer task; the mutex keeps lines from interleaving
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl DebugLogger {
    /// Opens (and truncates) the log file when `enabled`; otherwise, or when the
    /// file cannot be created, returns a disabled logger
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        let opened = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await;

        match opened {
            Ok(file) => {
                info!("Debug logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                Self::disabled()
            }
        }
    }

    /// Creates a disabled debug logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Logs a move decision asynchronously (fire-and-forget)
    /// This spawns a tokio task that writes to the file without blocking
    pub fn log_move(
        &self,
        turn: i32,
        ruleset: &str,
        you_id: &str,
        board: Board,
        chosen_move: Direction,
    ) {
        if !self.enabled {
            return;
        }

        let file_handle = self.file.clone();
        let entry = DebugLogEntry {
            turn,
            you_id: you_id.to_string(),
            ruleset: ruleset.to_string(),
            chosen_move: chosen_move.as_str().to_string(),
            board,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        tokio::spawn(async move {
            Self::write_entry(file_handle, entry).await;
        });
    }

    /// Appends one entry; entries from concurrent tasks are serialized by the mutex
    async fn write_entry(file_handle: Arc<Mutex<Option<File>>>, entry: DebugLogEntry) {
        let mut file_guard = file_handle.lock().await;
        let file = match file_guard.as_mut() {
            Some(file) => file,
            None => return,
        };

        if let Err(e) = Self::append_line(file, &entry).await {
            error!("Debug log turn {}: {}", entry.turn, e);
        }
    }

    async fn append_line(file: &mut File, entry: &DebugLogEntry) -> Result<(), String> {
        let mut line =
            serde_json::to_string(entry).map_err(|e| format!("serialization failed: {}", e))?;
        line.push('\n');
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| format!("write failed: {}", e))?;
        file.flush().await.map_err(|e| format!("flush failed: {}", e))
    }
}
