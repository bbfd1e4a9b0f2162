// src/exec/backend.rs

//! Pluggable compile backend.
//!
//! The runtime talks to a `CompileBackend` instead of spawning work itself,
//! so tests can swap in a fake that records requests and answers instantly.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::compile::CompileTask;
use crate::engine::{CompileRequest, RuntimeEvent};
use crate::errors::Result;

use super::runner::run_compile;

/// Trait abstracting how a compile request is executed.
///
/// Implementations must eventually send exactly one
/// `RuntimeEvent::CompileFinished` carrying the request's `run_id`.
pub trait CompileBackend: Send {
    fn dispatch(
        &mut self,
        request: CompileRequest,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Production backend: runs the compile task on a Tokio task and reports the
/// outcome on the runtime channel.
pub struct RealCompileBackend {
    task: Arc<CompileTask>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
}

impl RealCompileBackend {
    pub fn new(task: Arc<CompileTask>, runtime_tx: mpsc::Sender<RuntimeEvent>) -> Self {
        Self { task, runtime_tx }
    }
}

impl CompileBackend for RealCompileBackend {
    fn dispatch(
        &mut self,
        request: CompileRequest,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let task = Arc::clone(&self.task);
        let tx = self.runtime_tx.clone();

        Box::pin(async move {
            // Detached: the runtime loop keeps reading events while this runs.
            tokio::spawn(run_compile(task, request, tx));
            Ok(())
        })
    }
}
