//! # Session Controller
//!
//! Runs one [`GameSession`] on the tokio clock: a cancellable tick task for
//! the countdown, a deferred settlement task per submission, the host
//! contract, and the single session-end listener.
//!
//! ## Controller Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      SessionController                                  │
//! │                                                                         │
//! │   presentation                                                          │
//! │   start / stage / submit / reset / restart / return_home                │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   ┌─────────────────────── Mutex<Inner> ───────────────────────────┐   │
//! │   │  GameSession   TimerController   settlement handle   listener  │   │
//! │   └───────▲───────────────▲────────────────────▲───────────────────┘   │
//! │           │               │                    │                        │
//! │     ticker task ── every tick_interval   settlement task ── +500ms     │
//! │     (Weak ref, epoch-checked)            (Weak ref, ticket-checked)     │
//! │                                                                         │
//! │   session ended ──► listener(summary) ──► host.collect/persist_report  │
//! │                     (outside the lock)                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering
//! Every task takes the lock, then consumes overdue ticks before doing
//! anything else. A settlement that wakes in the same instant the countdown
//! hits zero therefore sees the timeout first and is discarded.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use cashier_core::{
    AmountDue, CashTray, ClockEffect, CoreError, Denomination, GameOverSummary, GameSession,
    PendingSettlement, Progress, SessionPhase, SessionSnapshot, Settlement,
};

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::events::{NoOpEmitter, SessionEventEmitter};
use crate::host::{GameHost, ReportRequest};
use crate::timer::TimerController;

/// Terminal-result listener.
pub type SessionEndListener = Arc<dyn Fn(&GameOverSummary) + Send + Sync>;

// =============================================================================
// Shared State
// =============================================================================

struct Inner {
    session: GameSession,
    timer: TimerController,
    /// Ticket and task of the pending settlement.
    settlement: Option<(u64, JoinHandle<()>)>,
    rng: StdRng,
    session_id: Uuid,
    listener: Option<SessionEndListener>,
    onboarding_pending: bool,
}

struct Shared<H: GameHost> {
    host: H,
    config: SessionConfig,
    emitter: Arc<dyn SessionEventEmitter>,
    inner: Mutex<Inner>,
}

/// Everything needed to announce an ended session once the lock is gone.
struct Ending {
    summary: GameOverSummary,
    request: ReportRequest,
    listener: Option<SessionEndListener>,
}

enum TickFlow {
    Continue,
    Stop,
    Ended(Ending),
}

impl<H: GameHost> Shared<H> {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Starts a fresh tick cadence and its task.
    fn arm_ticker(self: &Arc<Self>, inner: &mut Inner) {
        let epoch = inner.timer.arm(Instant::now());
        let handle = tokio::spawn(run_ticker(Arc::downgrade(self), epoch));
        inner.timer.attach(handle);
    }

    /// Stops every task and packages the terminal result.
    fn close(&self, inner: &mut Inner, summary: GameOverSummary) -> Ending {
        inner.timer.disarm();
        if let Some((_, handle)) = inner.settlement.take() {
            handle.abort();
        }

        info!(
            session_id = %inner.session_id,
            outcome = %summary.outcome,
            score = summary.score,
            level = summary.level_index,
            "Session ended"
        );

        Ending {
            request: ReportRequest {
                session_id: inner.session_id,
                level: summary.level_index,
                result: summary.outcome,
                score: summary.score,
                finished_at: Utc::now(),
            },
            listener: inner.listener.clone(),
            summary,
        }
    }

    /// Notifies the listener and hands the report to the host.
    async fn conclude(&self, ending: Ending) {
        if let Some(listener) = &ending.listener {
            listener(&ending.summary);
        }

        let report = self.host.collect_report(ending.request);
        if let Err(e) = self.host.persist_report(report).await {
            error!(error = %e, "Failed to persist session report");
        }
    }

    /// Applies every tick due for `epoch`.
    fn on_tick(&self, epoch: u64) -> TickFlow {
        let mut guard = self.lock();
        let inner = &mut *guard;

        if !inner.timer.is_current(epoch) {
            return TickFlow::Stop;
        }

        let due = inner.timer.take_due(Instant::now());
        if due == 0 {
            return TickFlow::Continue;
        }
        if due > 1 {
            debug!(missed = due - 1, "Applying missed ticks");
        }

        match inner.session.elapse(due) {
            ClockEffect::Remaining { remaining_secs } => {
                self.emitter.emit_tick(remaining_secs);
                TickFlow::Continue
            }
            ClockEffect::Inert => {
                inner.timer.detach();
                inner.timer.disarm();
                TickFlow::Stop
            }
            ClockEffect::TimedOut(summary) => {
                self.emitter.emit_tick(0);
                inner.timer.detach();
                TickFlow::Ended(self.close(inner, summary))
            }
        }
    }

    /// Applies the buffered verdict for `ticket`, after any overdue ticks.
    fn on_settle(self: &Arc<Self>, ticket: u64) -> Option<Ending> {
        let mut guard = self.lock();
        let inner = &mut *guard;

        // This task is finishing; dropping its own handle detaches it.
        if matches!(inner.settlement, Some((t, _)) if t == ticket) {
            inner.settlement = None;
        }

        let due = inner.timer.take_due(Instant::now());
        if due > 0 {
            match inner.session.elapse(due) {
                ClockEffect::TimedOut(summary) => {
                    debug!(ticket, "Timeout preempted settlement");
                    self.emitter.emit_tick(0);
                    return Some(self.close(inner, summary));
                }
                ClockEffect::Remaining { remaining_secs } => self.emitter.emit_tick(remaining_secs),
                ClockEffect::Inert => {}
            }
        }

        let report = match inner.session.settle(ticket, &mut inner.rng) {
            Settlement::Applied(report) => report,
            Settlement::Stale => {
                debug!(ticket, "Discarding stale settlement");
                return None;
            }
        };

        debug!(
            ticket,
            outcome = %report.outcome,
            effect = ?report.effect,
            progress = ?report.progress,
            "Settlement applied"
        );
        self.emitter.emit_settled(&report);

        match report.progress {
            Some(Progress::LevelAdvanced { level_index }) => {
                info!(level = level_index, "Level advanced");
                self.arm_ticker(inner);
                if let Some(level) = inner.session.current_level() {
                    self.emitter.emit_level(level_index, level);
                }
                self.announce_customer(inner);
            }
            Some(Progress::NextCustomer { .. }) => self.announce_customer(inner),
            Some(Progress::GameComplete) | None => {}
        }

        report.ended.map(|summary| self.close(inner, summary))
    }

    fn announce_customer(&self, inner: &Inner) {
        if let Some(due) = inner.session.amount_due() {
            self.emitter
                .emit_customer(inner.session.state().customer_index, &due);
        }
    }

    /// Cancels all tasks and returns the machine to `NotStarted`.
    fn reset_locked(&self, inner: &mut Inner) {
        inner.timer.disarm();
        if let Some((_, handle)) = inner.settlement.take() {
            handle.abort();
        }
        inner.session.reset();
    }
}

async fn run_ticker<H: GameHost>(shared: Weak<Shared<H>>, epoch: u64) {
    loop {
        let deadline = {
            let Some(strong) = shared.upgrade() else {
                return;
            };
            let inner = strong.lock();
            if !inner.timer.is_current(epoch) {
                return;
            }
            match inner.timer.next_tick_at() {
                Some(at) => at,
                None => return,
            }
        };

        tokio::time::sleep_until(deadline).await;

        let Some(strong) = shared.upgrade() else {
            return;
        };
        match strong.on_tick(epoch) {
            TickFlow::Continue => {}
            TickFlow::Stop => return,
            TickFlow::Ended(ending) => {
                strong.conclude(ending).await;
                return;
            }
        }
    }
}

async fn run_settlement<H: GameHost>(
    shared: Weak<Shared<H>>,
    ticket: u64,
    delay: std::time::Duration,
) {
    tokio::time::sleep(delay).await;

    let Some(strong) = shared.upgrade() else {
        return;
    };
    if let Some(ending) = strong.on_settle(ticket) {
        strong.conclude(ending).await;
    }
}

// =============================================================================
// Session Controller
// =============================================================================

/// Drives one game session at a time for a presentation layer.
///
/// ## Example
/// ```rust,no_run
/// use cashier_core::{Denomination, LevelTable};
/// use cashier_session::{InMemoryHost, SessionConfig, SessionController};
///
/// # async fn demo() -> cashier_session::SessionResult<()> {
/// let controller = SessionController::new(
///     InMemoryHost::new(LevelTable::standard()),
///     SessionConfig::default(),
/// );
/// controller.on_session_end(|summary| println!("{}", summary.message));
///
/// controller.start().await?;
/// controller.stage(Denomination::Ten)?;
/// let pending = controller.submit_staged()?;
/// println!("verdict: {}", pending.outcome);
/// # Ok(())
/// # }
/// ```
pub struct SessionController<H: GameHost> {
    shared: Arc<Shared<H>>,
}

impl<H: GameHost> SessionController<H> {
    /// Creates a controller with a no-op emitter and an entropy-seeded RNG.
    pub fn new(host: H, config: SessionConfig) -> Self {
        SessionControllerBuilder::new(host).config(config).build()
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Preloads assets, then starts a session on the first level.
    ///
    /// ## Errors
    /// - `Core(InvalidPhase)` if a session is already running or ended
    /// - `AssetPreload` if the host could not load assets; the session stays
    ///   `NotStarted` and nothing retries on its own
    pub async fn start(&self) -> SessionResult<()> {
        {
            let inner = self.shared.lock();
            let phase = inner.session.phase();
            if phase != SessionPhase::NotStarted {
                return Err(CoreError::InvalidPhase {
                    operation: "start",
                    phase,
                }
                .into());
            }
        }

        if let Err(e) = self.shared.host.preload_assets().await {
            warn!(error = %e, "Asset preload failed, session not started");
            return Err(match e {
                SessionError::AssetPreload(msg) => SessionError::AssetPreload(msg),
                other => SessionError::AssetPreload(other.to_string()),
            });
        }

        let mut guard = self.shared.lock();
        let inner = &mut *guard;
        inner.session.start(&mut inner.rng)?;
        inner.session_id = Uuid::new_v4();
        self.shared.arm_ticker(inner);

        info!(
            session_id = %inner.session_id,
            levels = inner.session.levels().len(),
            "Session started"
        );

        if let Some(level) = inner.session.current_level() {
            self.shared.emitter.emit_level(0, level);
        }
        self.shared.announce_customer(inner);
        Ok(())
    }

    /// Any phase → `NotStarted`. Cancels the countdown and any pending
    /// settlement.
    pub fn reset(&self) {
        let mut guard = self.shared.lock();
        self.shared.reset_locked(&mut guard);
        info!("Session reset");
    }

    /// Reset followed by start ("Restart" on the game-over screen).
    pub async fn restart(&self) -> SessionResult<()> {
        self.reset();
        self.start().await
    }

    /// Reset and show onboarding again ("Back to Home").
    pub fn return_home(&self) {
        let mut guard = self.shared.lock();
        self.shared.reset_locked(&mut guard);
        guard.onboarding_pending = self.shared.config.show_onboarding;
        info!("Returned to home screen");
    }

    /// Registers the terminal-result listener, replacing any previous one.
    pub fn on_session_end<F>(&self, listener: F)
    where
        F: Fn(&GameOverSummary) + Send + Sync + 'static,
    {
        self.shared.lock().listener = Some(Arc::new(listener));
    }

    // -------------------------------------------------------------------------
    // Player Input
    // -------------------------------------------------------------------------

    pub fn stage(&self, denomination: Denomination) -> SessionResult<u32> {
        Ok(self.shared.lock().session.stage(denomination)?)
    }

    /// Stages `count` of one denomination in a single step; on error the
    /// tray is unchanged.
    pub fn stage_many(&self, denomination: Denomination, count: u32) -> SessionResult<u32> {
        Ok(self.shared.lock().session.stage_many(denomination, count)?)
    }

    pub fn unstage(&self, denomination: Denomination) -> SessionResult<u32> {
        Ok(self.shared.lock().session.unstage(denomination)?)
    }

    pub fn clear_tray(&self) -> SessionResult<()> {
        Ok(self.shared.lock().session.clear_tray()?)
    }

    /// Judges `tray` now and settles it after the feedback window.
    pub fn submit(&self, tray: CashTray) -> SessionResult<PendingSettlement> {
        let mut guard = self.shared.lock();
        let pending = guard.session.submit(tray)?;
        self.schedule_settlement(&mut guard, pending);
        Ok(pending)
    }

    /// Submits the staged tray.
    pub fn submit_staged(&self) -> SessionResult<PendingSettlement> {
        let mut guard = self.shared.lock();
        let pending = guard.session.submit_staged()?;
        self.schedule_settlement(&mut guard, pending);
        Ok(pending)
    }

    /// Ends an active session with `timeout` right away, skipping any
    /// pending settlement. Returns `None` if no session was active.
    pub async fn expire_timer(&self) -> Option<GameOverSummary> {
        let ending = {
            let mut guard = self.shared.lock();
            let summary = guard.session.expire_timer()?;
            self.shared.close(&mut guard, summary)
        };

        let summary = ending.summary.clone();
        self.shared.conclude(ending).await;
        Some(summary)
    }

    // -------------------------------------------------------------------------
    // Onboarding
    // -------------------------------------------------------------------------

    pub fn should_show_onboarding(&self) -> bool {
        self.shared.lock().onboarding_pending
    }

    pub fn acknowledge_onboarding(&self) {
        self.shared.lock().onboarding_pending = false;
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.lock().session.snapshot()
    }

    pub fn amount_due(&self) -> Option<AmountDue> {
        self.shared.lock().session.amount_due()
    }

    pub fn remaining_secs(&self) -> u32 {
        self.shared.lock().session.remaining_secs()
    }

    pub fn is_session_ended(&self) -> bool {
        self.shared.lock().session.is_session_ended()
    }

    pub fn is_game_complete(&self) -> bool {
        self.shared.lock().session.is_game_complete()
    }

    pub fn summary(&self) -> Option<GameOverSummary> {
        self.shared.lock().session.summary()
    }

    pub fn session_id(&self) -> Uuid {
        self.shared.lock().session_id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.shared.config
    }

    pub fn host(&self) -> &H {
        &self.shared.host
    }

    fn schedule_settlement(&self, inner: &mut Inner, pending: PendingSettlement) {
        debug!(
            ticket = pending.ticket,
            outcome = %pending.outcome,
            "Submission judged, settling after delay"
        );
        self.shared.emitter.emit_verdict(&pending);

        let handle = tokio::spawn(run_settlement(
            Arc::downgrade(&self.shared),
            pending.ticket,
            self.shared.config.settlement_delay(),
        ));
        if let Some((_, previous)) = inner.settlement.replace((pending.ticket, handle)) {
            previous.abort();
        }
    }
}

impl<H: GameHost> Drop for SessionController<H> {
    fn drop(&mut self) {
        let mut guard = self.shared.lock();
        guard.timer.disarm();
        if let Some((_, handle)) = guard.settlement.take() {
            handle.abort();
        }
    }
}

// =============================================================================
// Builder Pattern
// =============================================================================

/// Builder for creating a SessionController with options.
pub struct SessionControllerBuilder<H: GameHost> {
    host: H,
    config: SessionConfig,
    emitter: Option<Arc<dyn SessionEventEmitter>>,
    seed: Option<u64>,
}

impl<H: GameHost> SessionControllerBuilder<H> {
    pub fn new(host: H) -> Self {
        SessionControllerBuilder {
            host,
            config: SessionConfig::default(),
            emitter: None,
            seed: None,
        }
    }

    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn emitter(mut self, emitter: Arc<dyn SessionEventEmitter>) -> Self {
        self.emitter = Some(emitter);
        self
    }

    /// Fixes the RNG seed so amounts are reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> SessionController<H> {
        let levels = self.host.levels();
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let inner = Inner {
            session: GameSession::new(levels, self.config.tender()),
            timer: TimerController::new(self.config.tick_interval()),
            settlement: None,
            rng,
            session_id: Uuid::nil(),
            listener: None,
            onboarding_pending: self.config.show_onboarding,
        };

        SessionController {
            shared: Arc::new(Shared {
                host: self.host,
                config: self.config,
                emitter: self.emitter.unwrap_or_else(|| Arc::new(NoOpEmitter)),
                inner: Mutex::new(inner),
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::InMemoryHost;
    use cashier_core::{Level, LevelTable, Outcome, SettlementReport, TimerState};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::sleep;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn levels(specs: &[(u32, u32, u32)]) -> LevelTable {
        LevelTable::new(
            specs
                .iter()
                .map(|&(m, secs, lives)| Level::new(m, secs, lives, true).unwrap())
                .collect(),
        )
        .unwrap()
    }

    fn controller(table: LevelTable) -> SessionController<InMemoryHost> {
        SessionControllerBuilder::new(InMemoryHost::new(table))
            .seed(7)
            .build()
    }

    fn exact_tray(due: AmountDue) -> CashTray {
        let mut left = due.total().cents();
        let mut tray = CashTray::new();
        for d in Denomination::ALL {
            let face = d.face_value().cents();
            let n = left / face;
            if n > 0 {
                tray.add_many(d, n as u32).unwrap();
                left -= n * face;
            }
        }
        tray
    }

    fn wrong_tray(due: AmountDue) -> CashTray {
        let mut tray = exact_tray(due);
        tray.add(Denomination::TenCents).unwrap();
        tray
    }

    fn count_endings(c: &SessionController<InMemoryHost>) -> Arc<Mutex<Vec<Outcome>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        c.on_session_end(move |summary| sink.lock().unwrap().push(summary.outcome));
        seen
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_runs_countdown() {
        let c = controller(LevelTable::standard());
        c.start().await.unwrap();
        assert_eq!(c.snapshot().phase, SessionPhase::Active);
        assert_eq!(c.remaining_secs(), 60);

        sleep(ms(3_500)).await;
        assert_eq!(c.remaining_secs(), 57);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_settles_after_delay() {
        let c = controller(levels(&[(1, 60, 3)]));
        c.start().await.unwrap();

        let due = c.amount_due().unwrap();
        let pending = c.submit(exact_tray(due)).unwrap();
        assert_eq!(pending.outcome, Outcome::Success);

        // Still in the feedback window.
        sleep(ms(400)).await;
        assert_eq!(c.snapshot().state.score, 0);
        assert!(c.snapshot().settlement_pending);
        assert!(matches!(
            c.submit_staged(),
            Err(SessionError::Core(CoreError::SettlementPending))
        ));

        sleep(ms(200)).await;
        let snap = c.snapshot();
        assert_eq!(snap.state.score, 10);
        assert_eq!(snap.state.customer_index, 2);
        assert!(!snap.settlement_pending);
        assert!(snap.state.cash.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_on_last_life_ends_session() {
        let c = controller(levels(&[(1, 60, 1)]));
        let endings = count_endings(&c);
        c.start().await.unwrap();

        let due = c.amount_due().unwrap();
        c.submit(wrong_tray(due)).unwrap();
        sleep(ms(600)).await;

        assert!(c.is_session_ended());
        assert_eq!(*endings.lock().unwrap(), vec![Outcome::Error]);
        assert_eq!(c.snapshot().timer, TimerState::Idle);

        let reports = c.host().reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].result, Outcome::Error);
        assert_eq!(reports[0].session_id, c.session_id());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_ends_session_once() {
        let c = controller(levels(&[(1, 3, 3)]));
        let endings = count_endings(&c);
        c.start().await.unwrap();

        sleep(ms(3_100)).await;
        assert!(c.is_session_ended());
        assert_eq!(c.summary().unwrap().message, "You ran out of time!");
        assert_eq!(c.snapshot().state.remaining_lives, 3);

        sleep(ms(5_000)).await;
        assert_eq!(*endings.lock().unwrap(), vec![Outcome::Timeout]);
        assert_eq!(c.host().reports().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_wins_over_simultaneous_settlement() {
        let c = controller(levels(&[(1, 1, 3)]));
        let endings = count_endings(&c);
        c.start().await.unwrap();

        // Settlement lands at exactly t = 1s, the same instant the countdown expires.
        sleep(ms(500)).await;
        let due = c.amount_due().unwrap();
        c.submit(exact_tray(due)).unwrap();

        sleep(ms(1_000)).await;
        assert_eq!(c.snapshot().terminal, Some(Outcome::Timeout));
        assert_eq!(c.snapshot().state.score, 0);
        assert_eq!(*endings.lock().unwrap(), vec![Outcome::Timeout]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_level_advance_resets_timer() {
        let c = controller(levels(&[(10, 20, 3), (5, 30, 3)]));
        c.start().await.unwrap();
        sleep(ms(5_200)).await;
        assert_eq!(c.remaining_secs(), 15);

        for _ in 0..4 {
            let due = c.amount_due().unwrap();
            c.submit(exact_tray(due)).unwrap();
            sleep(ms(600)).await;
        }

        let snap = c.snapshot();
        assert_eq!(snap.state.level_index, 1);
        assert_eq!(snap.state.customer_index, 1);
        assert_eq!(snap.remaining_secs, 30);

        // The new cadence starts at the level change.
        sleep(ms(1_100)).await;
        assert_eq!(c.remaining_secs(), 29);
    }

    #[tokio::test(start_paused = true)]
    async fn test_game_complete_reports_success() {
        let c = controller(levels(&[(10, 60, 3)]));
        let endings = count_endings(&c);
        c.start().await.unwrap();

        for _ in 0..4 {
            let due = c.amount_due().unwrap();
            c.submit(exact_tray(due)).unwrap();
            sleep(ms(600)).await;
        }

        assert!(c.is_game_complete());
        assert!(c.is_session_ended());
        assert_eq!(*endings.lock().unwrap(), vec![Outcome::Success]);
        assert_eq!(c.host().reports()[0].score, 40);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_cancels_pending_settlement() {
        let c = controller(levels(&[(1, 60, 3)]));
        c.start().await.unwrap();

        let due = c.amount_due().unwrap();
        c.submit(exact_tray(due)).unwrap();
        c.reset();
        c.start().await.unwrap();

        sleep(ms(1_000)).await;
        let snap = c.snapshot();
        assert_eq!(snap.state.score, 0);
        assert_eq!(snap.state.customer_index, 1);
        assert!(!snap.settlement_pending);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_stops_the_clock() {
        let c = controller(levels(&[(1, 2, 3)]));
        let endings = count_endings(&c);
        c.start().await.unwrap();
        c.reset();

        sleep(ms(5_000)).await;
        assert_eq!(c.snapshot().phase, SessionPhase::NotStarted);
        assert!(endings.lock().unwrap().is_empty());
        assert!(c.host().reports().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expire_timer_skips_settlement() {
        let c = controller(levels(&[(1, 60, 3)]));
        let endings = count_endings(&c);
        c.start().await.unwrap();

        let due = c.amount_due().unwrap();
        c.submit(exact_tray(due)).unwrap();
        let summary = c.expire_timer().await.unwrap();
        assert_eq!(summary.outcome, Outcome::Timeout);

        sleep(ms(1_000)).await;
        assert_eq!(c.snapshot().state.score, 0);
        assert!(c.expire_timer().await.is_none());
        assert_eq!(endings.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_preload_failure_keeps_session_idle() {
        let host = InMemoryHost::new(LevelTable::standard());
        host.set_preload_failure(true);
        let c = SessionControllerBuilder::new(host).seed(1).build();

        assert!(matches!(c.start().await, Err(SessionError::AssetPreload(_))));
        assert_eq!(c.snapshot().phase, SessionPhase::NotStarted);

        sleep(ms(5_000)).await;
        assert_eq!(c.host().preload_calls(), 1);

        c.host().set_preload_failure(false);
        c.start().await.unwrap();
        assert_eq!(c.snapshot().phase, SessionPhase::Active);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_game_over() {
        let c = controller(levels(&[(1, 1, 3)]));
        c.start().await.unwrap();
        sleep(ms(1_100)).await;
        assert!(c.is_session_ended());
        let first = c.session_id();

        c.restart().await.unwrap();
        assert_eq!(c.snapshot().phase, SessionPhase::Active);
        assert_ne!(c.session_id(), first);
        assert!(c.summary().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_onboarding_flag() {
        let c = controller(LevelTable::standard());
        assert!(c.should_show_onboarding());
        c.acknowledge_onboarding();
        assert!(!c.should_show_onboarding());

        c.start().await.unwrap();
        c.return_home();
        assert!(c.should_show_onboarding());
        assert_eq!(c.snapshot().phase, SessionPhase::NotStarted);

        let config = SessionConfig {
            show_onboarding: false,
            ..SessionConfig::default()
        };
        let quiet = SessionControllerBuilder::new(InMemoryHost::new(LevelTable::standard()))
            .config(config)
            .build();
        assert!(!quiet.should_show_onboarding());
    }

    #[tokio::test(start_paused = true)]
    async fn test_emitter_sees_ticks_and_customers() {
        #[derive(Default)]
        struct Counting {
            ticks: AtomicUsize,
            customers: AtomicUsize,
            settled: AtomicUsize,
        }

        impl SessionEventEmitter for Counting {
            fn emit_tick(&self, _remaining_secs: u32) {
                self.ticks.fetch_add(1, Ordering::SeqCst);
            }
            fn emit_verdict(&self, _pending: &PendingSettlement) {}
            fn emit_settled(&self, _report: &SettlementReport) {
                self.settled.fetch_add(1, Ordering::SeqCst);
            }
            fn emit_customer(&self, _customer_index: u8, _due: &AmountDue) {
                self.customers.fetch_add(1, Ordering::SeqCst);
            }
            fn emit_level(&self, _level_index: usize, _level: &Level) {}
        }

        let emitter = Arc::new(Counting::default());
        let c = SessionControllerBuilder::new(InMemoryHost::new(levels(&[(1, 60, 3)])))
            .emitter(emitter.clone())
            .seed(3)
            .build();
        c.start().await.unwrap();

        sleep(ms(2_100)).await;
        let due = c.amount_due().unwrap();
        c.submit(exact_tray(due)).unwrap();
        sleep(ms(600)).await;

        assert_eq!(emitter.ticks.load(Ordering::SeqCst), 2);
        assert_eq!(emitter.settled.load(Ordering::SeqCst), 1);
        assert_eq!(emitter.customers.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_before_start_rejected() {
        let c = controller(LevelTable::standard());
        let err = c.submit(CashTray::new()).unwrap_err();
        assert!(err.is_user_error());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_clock_and_pending_settlement() {
        struct SharedHost(Arc<InMemoryHost>);

        #[async_trait::async_trait]
        impl GameHost for SharedHost {
            type Report = ReportRequest;

            fn levels(&self) -> LevelTable {
                self.0.levels()
            }

            async fn preload_assets(&self) -> SessionResult<()> {
                self.0.preload_assets().await
            }

            fn collect_report(&self, request: ReportRequest) -> ReportRequest {
                request
            }

            async fn persist_report(&self, report: ReportRequest) -> SessionResult<()> {
                self.0.persist_report(report).await
            }
        }

        let host = Arc::new(InMemoryHost::new(levels(&[(1, 2, 1)])));
        let c = SessionControllerBuilder::new(SharedHost(host.clone()))
            .seed(7)
            .build();
        let endings = Arc::new(AtomicUsize::new(0));
        let counter = endings.clone();
        c.on_session_end(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        c.start().await.unwrap();
        let due = c.amount_due().unwrap();
        c.submit(wrong_tray(due)).unwrap();
        drop(c);

        // Past both the settlement delay and the 2s countdown.
        sleep(ms(5_000)).await;
        assert_eq!(endings.load(Ordering::SeqCst), 0);
        assert!(host.reports().is_empty());
    }
}
