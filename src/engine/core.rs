// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! `Idle -> Watching -> (change) -> Compiling -> Watching`, ending in
//! `Stopped` on shutdown. The core consumes [`RuntimeEvent`]s and returns
//! commands for the IO shell (`engine::runtime::Runtime`), which does the
//! channel reading and compile dispatching.
//!
//! Nothing in here touches Tokio, channels, the filesystem or the compiler,
//! so every transition is unit tested directly.

use crate::engine::event_handlers::{
    CoreStep, handle_compile_finished, handle_shutdown, handle_sources_changed,
};
use crate::engine::queue::TriggerQueue;
use crate::engine::slot::CompileSlot;
use crate::engine::{CompileStats, RuntimeEvent, WatchState};
use crate::types::BusyPolicy;

#[derive(Debug)]
pub struct CoreRuntime {
    slot: CompileSlot,
    queue: TriggerQueue,
}

impl CoreRuntime {
    pub fn new(policy: BusyPolicy, queue_length: usize) -> Self {
        Self {
            slot: CompileSlot::new(),
            queue: TriggerQueue::new(policy, queue_length),
        }
    }

    /// Mark the watch subscription as open.
    pub fn start(&mut self) {
        self.slot.open();
    }

    pub fn state(&self) -> WatchState {
        self.slot.state()
    }

    pub fn stats(&self) -> CompileStats {
        self.slot.stats()
    }

    pub fn pending_compiles(&self) -> usize {
        self.queue.len()
    }

    /// Handle a single runtime event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::SourcesChanged { paths, reason } => {
                handle_sources_changed(&mut self.slot, &mut self.queue, paths, reason)
            }
            RuntimeEvent::CompileFinished { run_id, outcome } => {
                handle_compile_finished(&mut self.slot, &mut self.queue, run_id, outcome)
            }
            RuntimeEvent::ShutdownRequested => handle_shutdown(&mut self.slot, &mut self.queue),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::engine::{CompileOutcome, CompileRequest, CoreCommand, RunId, TriggerReason};

    fn changed(path: &str) -> RuntimeEvent {
        RuntimeEvent::SourcesChanged {
            paths: vec![PathBuf::from(path)],
            reason: TriggerReason::FileWatch,
        }
    }

    fn finished(run_id: RunId, outcome: CompileOutcome) -> RuntimeEvent {
        RuntimeEvent::CompileFinished { run_id, outcome }
    }

    fn single_dispatch(step: &CoreStep) -> CompileRequest {
        match step.commands.as_slice() {
            [CoreCommand::DispatchCompile(req)] => req.clone(),
            other => panic!("expected one DispatchCompile, got {other:?}"),
        }
    }

    fn started_core(policy: BusyPolicy, queue_length: usize) -> CoreRuntime {
        let mut core = CoreRuntime::new(policy, queue_length);
        assert_eq!(core.state(), WatchState::Idle);
        core.start();
        assert_eq!(core.state(), WatchState::Watching);
        core
    }

    #[test]
    fn change_while_watching_dispatches_one_compile() {
        let mut core = started_core(BusyPolicy::Coalesce, 1);

        let step = core.step(changed("scss/main.scss"));
        let req = single_dispatch(&step);

        assert!(step.keep_running);
        assert_eq!(req.run_id, 1);
        assert_eq!(req.changed, vec![PathBuf::from("scss/main.scss")]);
        assert_eq!(core.state(), WatchState::Compiling { run_id: 1 });
    }

    #[test]
    fn burst_during_compile_coalesces_into_one_follow_up() {
        let mut core = started_core(BusyPolicy::Coalesce, 1);
        single_dispatch(&core.step(changed("scss/main.scss")));

        for path in ["scss/a.scss", "scss/b.scss", "scss/a.scss"] {
            assert!(core.step(changed(path)).commands.is_empty());
        }
        assert_eq!(core.pending_compiles(), 1);

        let follow_up = single_dispatch(&core.step(finished(1, CompileOutcome::Success)));
        assert_eq!(follow_up.run_id, 2);
        assert_eq!(
            follow_up.changed,
            vec![PathBuf::from("scss/a.scss"), PathBuf::from("scss/b.scss")]
        );

        let last = core.step(finished(2, CompileOutcome::Success));
        assert!(last.commands.is_empty());
        assert_eq!(core.state(), WatchState::Watching);
        assert_eq!(core.stats().started, 2);
    }

    #[test]
    fn serialize_runs_each_batch_in_order() {
        let mut core = started_core(BusyPolicy::Serialize, 4);
        single_dispatch(&core.step(changed("first")));
        core.step(changed("second"));
        core.step(changed("third"));

        let second = single_dispatch(&core.step(finished(1, CompileOutcome::Success)));
        assert_eq!(second.changed, vec![PathBuf::from("second")]);
        let third = single_dispatch(&core.step(finished(2, CompileOutcome::Success)));
        assert_eq!(third.changed, vec![PathBuf::from("third")]);
        assert!(core.step(finished(3, CompileOutcome::Success)).commands.is_empty());
    }

    #[test]
    fn failed_compile_keeps_watching() {
        let mut core = started_core(BusyPolicy::Coalesce, 1);
        single_dispatch(&core.step(changed("scss/main.scss")));

        let step = core.step(finished(1, CompileOutcome::Failed));
        assert!(step.keep_running);
        assert_eq!(core.state(), WatchState::Watching);

        // The next change still compiles.
        let req = single_dispatch(&core.step(changed("scss/main.scss")));
        assert_eq!(req.run_id, 2);

        core.step(finished(2, CompileOutcome::Success));
        let stats = core.stats();
        assert_eq!((stats.started, stats.succeeded, stats.failed), (2, 1, 1));
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut core = started_core(BusyPolicy::Coalesce, 1);
        single_dispatch(&core.step(changed("scss/main.scss")));

        let step = core.step(finished(42, CompileOutcome::Success));
        assert!(step.commands.is_empty());
        assert_eq!(core.state(), WatchState::Compiling { run_id: 1 });
    }

    #[test]
    fn shutdown_when_watching_exits_immediately() {
        let mut core = started_core(BusyPolicy::Coalesce, 1);

        let step = core.step(RuntimeEvent::ShutdownRequested);
        assert!(!step.keep_running);
        assert_eq!(step.commands, vec![CoreCommand::RequestExit]);
        assert_eq!(core.state(), WatchState::Stopped);
    }

    #[test]
    fn shutdown_during_compile_waits_and_drops_pending() {
        let mut core = started_core(BusyPolicy::Coalesce, 1);
        single_dispatch(&core.step(changed("scss/main.scss")));
        core.step(changed("scss/other.scss"));

        let step = core.step(RuntimeEvent::ShutdownRequested);
        assert!(step.keep_running, "must wait for the in-flight compile");
        assert_eq!(core.pending_compiles(), 0);

        // Changes after the request are ignored.
        assert!(core.step(changed("scss/late.scss")).commands.is_empty());

        let last = core.step(finished(1, CompileOutcome::Success));
        assert!(!last.keep_running);
        assert_eq!(last.commands, vec![CoreCommand::RequestExit]);
        assert_eq!(core.stats().started, 1);
    }
}
