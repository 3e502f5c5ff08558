//! # Game Host
//!
//! The contract the session runtime consumes from whatever embeds it: a
//! level registry, asset preloading and a report sink.
//!
//! ```text
//! ┌──────────────────────┐            ┌──────────────────────────────┐
//! │  SessionController   │            │  GameHost (implemented by    │
//! │                      │            │  the embedding application)  │
//! │  construction ───────┼── levels ─►│  ordered level table         │
//! │  start() ────────────┼─ preload ─►│  load sprites / sounds       │
//! │  session ended ──────┼─ collect ─►│  build Report                │
//! │                 ─────┼─ persist ─►│  store Report                │
//! └──────────────────────┘            └──────────────────────────────┘
//! ```
//!
//! The runtime never looks inside a report; its shape belongs to the host.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use cashier_core::{LevelTable, Outcome};

use crate::error::{SessionError, SessionResult};

// =============================================================================
// Report Request
// =============================================================================

/// What the runtime knows about a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub session_id: Uuid,
    /// Level index the session ended on. Equals the level count after a
    /// completed game.
    pub level: usize,
    pub result: Outcome,
    pub score: u32,
    pub finished_at: DateTime<Utc>,
}

// =============================================================================
// Host Trait
// =============================================================================

/// Collaborator contract for the session runtime.
#[async_trait]
pub trait GameHost: Send + Sync + 'static {
    /// Host-defined report shape.
    type Report: Send + 'static;

    /// The ordered, non-empty level sequence. Read once per controller.
    fn levels(&self) -> LevelTable;

    /// Loads whatever the presentation needs. `start()` waits for this and
    /// does not start the session if it fails.
    async fn preload_assets(&self) -> SessionResult<()>;

    /// Builds the report for a terminal session.
    fn collect_report(&self, request: ReportRequest) -> Self::Report;

    /// Stores a report. Called once per terminal session.
    async fn persist_report(&self, report: Self::Report) -> SessionResult<()>;
}

// =============================================================================
// In-Memory Host
// =============================================================================

/// Host that keeps reports in memory. Used by tests and demos.
#[derive(Debug, Default)]
pub struct InMemoryHost {
    levels: LevelTable,
    fail_preload: AtomicBool,
    preload_calls: AtomicUsize,
    reports: Mutex<Vec<ReportRequest>>,
}

impl InMemoryHost {
    pub fn new(levels: LevelTable) -> Self {
        InMemoryHost {
            levels,
            ..Default::default()
        }
    }

    /// Makes subsequent preloads fail (or succeed again).
    pub fn set_preload_failure(&self, fail: bool) {
        self.fail_preload.store(fail, Ordering::SeqCst);
    }

    pub fn preload_calls(&self) -> usize {
        self.preload_calls.load(Ordering::SeqCst)
    }

    pub fn reports(&self) -> Vec<ReportRequest> {
        self.reports
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl GameHost for InMemoryHost {
    type Report = ReportRequest;

    fn levels(&self) -> LevelTable {
        self.levels.clone()
    }

    async fn preload_assets(&self) -> SessionResult<()> {
        self.preload_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_preload.load(Ordering::SeqCst) {
            return Err(SessionError::AssetPreload("assets unavailable".into()));
        }
        Ok(())
    }

    fn collect_report(&self, request: ReportRequest) -> Self::Report {
        request
    }

    async fn persist_report(&self, report: Self::Report) -> SessionResult<()> {
        self.reports
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(report);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_host_preload() {
        let host = InMemoryHost::new(LevelTable::standard());
        assert!(host.preload_assets().await.is_ok());

        host.set_preload_failure(true);
        assert!(matches!(
            host.preload_assets().await,
            Err(SessionError::AssetPreload(_))
        ));
        assert_eq!(host.preload_calls(), 2);
    }

    #[tokio::test]
    async fn test_in_memory_host_stores_reports() {
        let host = InMemoryHost::new(LevelTable::standard());
        let request = ReportRequest {
            session_id: Uuid::new_v4(),
            level: 2,
            result: Outcome::Timeout,
            score: 80,
            finished_at: Utc::now(),
        };

        let report = host.collect_report(request.clone());
        host.persist_report(report).await.unwrap();
        assert_eq!(host.reports(), vec![request]);
    }
}
