//! # Session Events
//!
//! Non-terminal progress notifications for the presentation layer.
//!
//! The terminal result does NOT go through here; it has its own single
//! listener (`SessionController::on_session_end`).
//!
//! Emitters are called while the session lock is held and must not call
//! back into the controller.

use cashier_core::{AmountDue, Level, PendingSettlement, SettlementReport};

/// Receives session progress (implemented by front ends).
pub trait SessionEventEmitter: Send + Sync {
    /// One countdown second passed.
    fn emit_tick(&self, remaining_secs: u32);

    /// A submission was judged; its settlement is pending.
    fn emit_verdict(&self, pending: &PendingSettlement);

    /// A settlement was applied.
    fn emit_settled(&self, report: &SettlementReport);

    /// A new customer is at the till.
    fn emit_customer(&self, customer_index: u8, due: &AmountDue);

    /// A level began.
    fn emit_level(&self, level_index: usize, level: &Level);
}

/// No-op event emitter for testing.
pub struct NoOpEmitter;

impl SessionEventEmitter for NoOpEmitter {
    fn emit_tick(&self, _remaining_secs: u32) {}
    fn emit_verdict(&self, _pending: &PendingSettlement) {}
    fn emit_settled(&self, _report: &SettlementReport) {}
    fn emit_customer(&self, _customer_index: u8, _due: &AmountDue) {}
    fn emit_level(&self, _level_index: usize, _level: &Level) {}
}
