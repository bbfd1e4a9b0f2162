// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::errors::Result;
use crate::exec::CompileBackend;

use super::core::CoreRuntime;
use super::{CompileStats, CoreCommand, RuntimeEvent};

/// Async IO shell around [`CoreRuntime`].
///
/// Reads `RuntimeEvent`s from a channel, feeds them to the core and hands
/// the resulting compiles to a [`CompileBackend`]. All watch semantics live
/// in the core.
pub struct Runtime<B: CompileBackend> {
    core: CoreRuntime,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    backend: B,
}

impl<B: CompileBackend> fmt::Debug for Runtime<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<B: CompileBackend> Runtime<B> {
    pub fn new(core: CoreRuntime, event_rx: mpsc::Receiver<RuntimeEvent>, backend: B) -> Self {
        Self {
            core,
            event_rx,
            backend,
        }
    }

    /// Main event loop. Returns the session's compile counters once the core
    /// asks to stop or every event sender is gone.
    pub async fn run(mut self) -> Result<CompileStats> {
        self.core.start();
        info!("watching for stylesheet changes");

        loop {
            let Some(event) = self.event_rx.recv().await else {
                info!("runtime event channel closed; exiting");
                break;
            };

            debug!(?event, "runtime received event");

            let step = self.core.step(event);

            for command in step.commands {
                self.execute_command(command).await?;
            }

            if !step.keep_running {
                break;
            }
        }

        let stats = self.core.stats();
        info!(
            started = stats.started,
            succeeded = stats.succeeded,
            failed = stats.failed,
            "watch session finished"
        );
        Ok(stats)
    }

    async fn execute_command(&mut self, command: CoreCommand) -> Result<()> {
        match command {
            CoreCommand::DispatchCompile(request) => {
                debug!(
                    run_id = request.run_id,
                    reason = ?request.reason,
                    changed = ?request.changed,
                    "dispatching compile"
                );
                self.backend.dispatch(request).await?;
            }
            CoreCommand::RequestExit => {
                debug!("core issued RequestExit");
            }
        }
        Ok(())
    }
}
