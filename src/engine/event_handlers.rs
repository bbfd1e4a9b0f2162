// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::engine::queue::{PendingCompile, TriggerQueue};
use crate::engine::slot::CompileSlot;
use crate::engine::{CompileOutcome, CompileRequest, RunId, TriggerReason};

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Hand this compile to the executor.
    DispatchCompile(CompileRequest),
    /// The session is over; the shell should return.
    RequestExit,
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn idle() -> Self {
        Self {
            commands: Vec::new(),
            keep_running: true,
        }
    }

    fn dispatch(request: CompileRequest) -> Self {
        Self {
            commands: vec![CoreCommand::DispatchCompile(request)],
            keep_running: true,
        }
    }

    fn exit() -> Self {
        Self {
            commands: vec![CoreCommand::RequestExit],
            keep_running: false,
        }
    }
}

/// Handle a batch of source changes.
///
/// - Slot free: start a compile right away.
/// - Compile in flight: record the batch in the queue (coalesced or
///   serialized according to the policy).
/// - Shutting down: ignore.
pub fn handle_sources_changed(
    slot: &mut CompileSlot,
    queue: &mut TriggerQueue,
    paths: Vec<PathBuf>,
    reason: TriggerReason,
) -> CoreStep {
    if slot.shutdown_requested() || slot.is_stopped() {
        debug!(changed = paths.len(), "shutdown in progress; ignoring change");
        return CoreStep::idle();
    }

    if slot.is_busy() {
        queue.record(paths, reason);
        return CoreStep::idle();
    }

    CoreStep::dispatch(slot.begin(PendingCompile::new(paths, reason)))
}

/// Handle a compile completion.
///
/// Failures are only counted here; the watch loop keeps going either way.
pub fn handle_compile_finished(
    slot: &mut CompileSlot,
    queue: &mut TriggerQueue,
    run_id: RunId,
    outcome: CompileOutcome,
) -> CoreStep {
    if !slot.finish(run_id, outcome) {
        return CoreStep::idle();
    }

    if slot.shutdown_requested() {
        info!(run_id, "in-flight compile finished; shutting down");
        slot.stop();
        return CoreStep::exit();
    }

    match queue.pop_next() {
        Some(pending) => {
            debug!(changed = pending.paths.len(), "starting queued compile");
            CoreStep::dispatch(slot.begin(pending))
        }
        None => CoreStep::idle(),
    }
}

/// Handle a shutdown request.
///
/// Pending compiles are discarded. A compile already in flight is allowed to
/// finish; the exit then happens on its completion.
pub fn handle_shutdown(slot: &mut CompileSlot, queue: &mut TriggerQueue) -> CoreStep {
    let dropped = queue.clear();
    if dropped > 0 {
        info!(dropped, "discarding pending compiles on shutdown");
    }

    if slot.is_busy() {
        info!("shutdown requested; waiting for the running compile to finish");
        slot.request_shutdown();
        return CoreStep::idle();
    }

    slot.stop();
    CoreStep::exit()
}
