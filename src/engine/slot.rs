// src/engine/slot.rs

//! The single compile slot: which run is in flight, the lifecycle state and
//! the session counters.

use tracing::{debug, warn};

use super::{CompileOutcome, CompileRequest, CompileStats, PendingCompile, RunId, WatchState};

#[derive(Debug)]
pub struct CompileSlot {
    state: WatchState,
    next_run_id: RunId,
    shutdown_requested: bool,
    stats: CompileStats,
}

impl Default for CompileSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl CompileSlot {
    pub fn new() -> Self {
        Self {
            state: WatchState::Idle,
            next_run_id: 1,
            shutdown_requested: false,
            stats: CompileStats::default(),
        }
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    pub fn stats(&self) -> CompileStats {
        self.stats
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, WatchState::Compiling { .. })
    }

    pub fn is_stopped(&self) -> bool {
        self.state == WatchState::Stopped
    }

    pub fn shutdown_requested(&self) -> bool {
        self.shutdown_requested
    }

    /// `Idle -> Watching`. No-op in any other state.
    pub fn open(&mut self) {
        if self.state == WatchState::Idle {
            self.state = WatchState::Watching;
        }
    }

    /// Occupy the slot with a new compile.
    ///
    /// Callers must check [`is_busy`](Self::is_busy) first.
    pub fn begin(&mut self, pending: PendingCompile) -> CompileRequest {
        debug_assert!(!self.is_busy(), "begin() while a compile is in flight");

        let run_id = self.next_run_id;
        self.next_run_id += 1;
        self.state = WatchState::Compiling { run_id };
        self.stats.started += 1;

        debug!(run_id, changed = pending.paths.len(), "compile slot occupied");

        CompileRequest {
            run_id,
            changed: pending.paths.into_iter().collect(),
            reason: pending.reason,
        }
    }

    /// Release the slot. Returns false for a completion that does not belong
    /// to the in-flight run, which is then ignored.
    pub fn finish(&mut self, run_id: RunId, outcome: CompileOutcome) -> bool {
        match self.state {
            WatchState::Compiling { run_id: current } if current == run_id => {}
            other => {
                warn!(run_id, state = ?other, "ignoring completion for unknown compile run");
                return false;
            }
        }

        match outcome {
            CompileOutcome::Success => self.stats.succeeded += 1,
            CompileOutcome::Failed => self.stats.failed += 1,
        }
        self.state = WatchState::Watching;
        true
    }

    pub fn request_shutdown(&mut self) {
        self.shutdown_requested = true;
    }

    pub fn stop(&mut self) {
        self.state = WatchState::Stopped;
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::engine::TriggerReason;

    fn pending(path: &str) -> PendingCompile {
        PendingCompile::new(vec![PathBuf::from(path)], TriggerReason::FileWatch)
    }

    #[test]
    fn run_ids_increase_per_compile() {
        let mut slot = CompileSlot::new();
        slot.open();

        let first = slot.begin(pending("a.scss"));
        assert!(slot.finish(first.run_id, CompileOutcome::Success));
        let second = slot.begin(pending("b.scss"));

        assert_eq!(first.run_id, 1);
        assert_eq!(second.run_id, 2);
        assert_eq!(slot.state(), WatchState::Compiling { run_id: 2 });
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut slot = CompileSlot::new();
        slot.open();
        let req = slot.begin(pending("a.scss"));

        assert!(!slot.finish(req.run_id + 1, CompileOutcome::Success));
        assert!(slot.is_busy());
        assert_eq!(slot.stats().succeeded, 0);

        assert!(slot.finish(req.run_id, CompileOutcome::Failed));
        assert!(!slot.finish(req.run_id, CompileOutcome::Failed));
        assert_eq!(
            slot.stats(),
            CompileStats {
                started: 1,
                succeeded: 0,
                failed: 1
            }
        );
    }

    #[test]
    fn open_only_leaves_idle() {
        let mut slot = CompileSlot::new();
        slot.stop();
        slot.open();
        assert!(slot.is_stopped());
    }
}
