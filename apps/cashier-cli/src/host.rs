//! # File Host
//!
//! [`GameHost`] for the terminal: levels come from the loaded config, and
//! every finished session is appended as one JSON line to a report file.
//!
//! ## Report File
//! ```text
//! ~/.local/share/cashier-chaos/reports.jsonl   (Linux default)
//!
//! {"session_id":"…","level":1,"result":"error","score":50,"message":"You ran out of lives!","finished_at":"…"}
//! {"session_id":"…","level":3,"result":"success","score":120,"message":"You completed all levels, well done!","finished_at":"…"}
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use uuid::Uuid;

use cashier_core::{GameOverSummary, LevelTable, Outcome};
use cashier_session::{GameHost, ReportRequest, SessionError, SessionResult};

const REPORT_FILE_NAME: &str = "reports.jsonl";

/// One line of the report file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLine {
    pub session_id: Uuid,
    /// 1-based level number as the player saw it.
    pub level: usize,
    pub result: Outcome,
    pub score: u32,
    pub message: String,
    pub finished_at: DateTime<Utc>,
}

impl ReportLine {
    /// Builds the line for a session played over `level_count` levels.
    ///
    /// A completed game reports the last level rather than one past it.
    pub fn new(request: ReportRequest, level_count: usize) -> Self {
        let message = GameOverSummary::new(request.result, request.score, request.level).message;
        ReportLine {
            session_id: request.session_id,
            level: (request.level + 1).min(level_count),
            result: request.result,
            score: request.score,
            message,
            finished_at: request.finished_at,
        }
    }
}

/// Default report location under the platform data directory.
///
/// Falls back to the working directory when no home directory is known.
pub fn default_report_path() -> PathBuf {
    ProjectDirs::from("com", "cashier", "chaos")
        .map(|dirs| dirs.data_dir().join(REPORT_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(REPORT_FILE_NAME))
}

#[derive(Debug, Clone)]
pub struct FileHost {
    levels: LevelTable,
    report_path: PathBuf,
}

impl FileHost {
    pub fn new(levels: LevelTable, report_path: PathBuf) -> Self {
        FileHost {
            levels,
            report_path,
        }
    }

    pub fn report_path(&self) -> &Path {
        &self.report_path
    }
}

#[async_trait]
impl GameHost for FileHost {
    type Report = ReportLine;

    fn levels(&self) -> LevelTable {
        self.levels.clone()
    }

    /// The terminal has no sprites; the only thing to prepare is the report
    /// directory.
    async fn preload_assets(&self) -> SessionResult<()> {
        if let Some(dir) = self.report_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await.map_err(|e| {
                SessionError::AssetPreload(format!(
                    "cannot create report directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }
        debug!(path = %self.report_path.display(), "Report directory ready");
        Ok(())
    }

    fn collect_report(&self, request: ReportRequest) -> Self::Report {
        ReportLine::new(request, self.levels.len())
    }

    async fn persist_report(&self, report: Self::Report) -> SessionResult<()> {
        let mut line = serde_json::to_string(&report)?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.report_path)
            .await
            .map_err(|e| SessionError::ReportPersist(e.to_string()))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| SessionError::ReportPersist(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| SessionError::ReportPersist(e.to_string()))?;

        info!(
            session_id = %report.session_id,
            result = %report.result,
            path = %self.report_path.display(),
            "Report saved"
        );
        Ok(())
    }
}
