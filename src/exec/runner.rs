// src/exec/runner.rs

//! Runs a single compile and reports back to the runtime.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::compile::CompileTask;
use crate::engine::{CompileOutcome, CompileRequest, RuntimeEvent};
use crate::errors::StylewatchError;

/// Run `request` to completion and send `CompileFinished`.
///
/// Every failure (missing entry, bad input, unwritable destination, even a
/// panic inside the compiler) is logged and reported as
/// `CompileOutcome::Failed`; nothing escapes to the watch loop.
pub async fn run_compile(
    task: Arc<CompileTask>,
    request: CompileRequest,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) {
    let run_id = request.run_id;
    info!(
        run_id,
        entry = %task.entry().display(),
        changed = request.changed.len(),
        "compiling"
    );

    let result = tokio::task::spawn_blocking(move || task.run()).await;

    let outcome = match result {
        Ok(Ok(_report)) => CompileOutcome::Success,
        Ok(Err(err)) => {
            report_failure(run_id, &err);
            CompileOutcome::Failed
        }
        Err(join_err) => {
            error!(run_id, error = %join_err, "compile task aborted");
            CompileOutcome::Failed
        }
    };

    if let Err(err) = runtime_tx
        .send(RuntimeEvent::CompileFinished { run_id, outcome })
        .await
    {
        warn!(run_id, "failed to report compile completion: {err}");
    }
}

fn report_failure(run_id: u64, err: &StylewatchError) {
    let kind = match err {
        StylewatchError::NotFound(_) => "not_found",
        StylewatchError::ConfigError(_) => "config",
        StylewatchError::CompileError(_) => "compile",
        StylewatchError::OutputError(_) => "output",
        _ => "other",
    };
    error!(run_id, kind, error = %err, "compile failed; still watching");
}
