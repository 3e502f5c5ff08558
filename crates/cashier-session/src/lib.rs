//! # cashier-session: Session Runtime for Cashier Chaos
//!
//! Puts the pure [`cashier_core::GameSession`] on a tokio clock and wires it
//! to its host.
//!
//! ## Session Runtime Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Session Runtime Architecture                       │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                     SessionController                            │  │
//! │  │  • start(): preload assets, first level, arm the countdown       │  │
//! │  │  • submit(): judge now, settle after the feedback window         │  │
//! │  │  • reset()/restart()/return_home(): cancel every task            │  │
//! │  │  • on_session_end(): the one terminal-result listener            │  │
//! │  └──────────────┬───────────────────────┬───────────────────────────┘  │
//! │                 │                       │                               │
//! │  ┌──────────────▼─────────┐   ┌─────────▼──────────────────────────┐   │
//! │  │   TimerController      │   │   GameHost (async-trait port)      │   │
//! │  │   tick task + epoch    │   │   levels / preload / reports       │   │
//! │  └────────────────────────┘   └────────────────────────────────────┘   │
//! │                                                                         │
//! │  PROGRESS EVENTS (SessionEventEmitter):                                │
//! │  • tick   - remaining seconds                                          │
//! │  • verdict / settled - submission lifecycle                            │
//! │  • customer / level  - what is at the till                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`controller`] - `SessionController` and its builder
//! - [`timer`] - Cancellable tick scheduling
//! - [`host`] - Host contract and the in-memory host
//! - [`events`] - Progress event emitter
//! - [`config`] - TOML + environment configuration
//! - [`error`] - Session error types

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod host;
pub mod timer;

pub use config::{GameConfig, SessionConfig};
pub use controller::{SessionController, SessionControllerBuilder, SessionEndListener};
pub use error::{SessionError, SessionResult};
pub use events::{NoOpEmitter, SessionEventEmitter};
pub use host::{GameHost, InMemoryHost, ReportRequest};
pub use timer::TimerController;
