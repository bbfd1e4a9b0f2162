// src/engine/mod.rs

//! Watch-mode engine.
//!
//! This module ties together:
//! - the compile slot (at most one compile in flight, run ids, stats)
//! - the trigger queue (what happens to changes that arrive mid-compile)
//! - the runtime event loop that reacts to:
//!   - file-watch batches
//!   - compile completion events
//!   - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use std::path::PathBuf;

/// Identifier of one compile dispatch. Strictly increasing per session.
pub type RunId = u64;

/// How a compile ended, as seen by the engine.
///
/// Details (error kind, message) are logged by the executor; the engine only
/// needs to know whether to count a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileOutcome {
    Success,
    Failed,
}

/// Why a compile was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerReason {
    /// Requested at startup (`watch --initial`).
    Manual,
    /// Triggered by a filesystem change.
    FileWatch,
}

/// Watch task lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    Watching,
    Compiling { run_id: RunId },
    Stopped,
}

/// A compile the IO shell should execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    pub run_id: RunId,
    /// Source paths whose changes led to this compile (empty for manual).
    pub changed: Vec<PathBuf>,
    pub reason: TriggerReason,
}

/// Counters over one watch session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileStats {
    pub started: u64,
    pub succeeded: u64,
    pub failed: u64,
}

/// Events flowing into the runtime from the watcher, the executor and the
/// signal handler.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// One batch of relevant source changes.
    SourcesChanged {
        paths: Vec<PathBuf>,
        reason: TriggerReason,
    },
    /// A dispatched compile finished.
    CompileFinished {
        run_id: RunId,
        outcome: CompileOutcome,
    },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod event_handlers;
pub mod queue;
pub mod runtime;
pub mod slot;

pub use core::CoreRuntime;
pub use event_handlers::{CoreCommand, CoreStep};
pub use queue::{PendingCompile, TriggerQueue};
pub use runtime::Runtime;
pub use slot::CompileSlot;
pub use crate::types::BusyPolicy;
