use std::collections::VecDeque;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use stylewatch::compile::{CompileOptions, StylesheetCompiler};
use stylewatch::engine::{CompileOutcome, CompileRequest, RuntimeEvent};
use stylewatch::errors::{Result, StylewatchError};
use stylewatch::exec::CompileBackend;

/// Compiler that returns canned CSS and records every source it was given.
///
/// Sources whose path contains `broken` fail with a `CompileError`.
#[derive(Debug, Clone, Default)]
pub struct FakeCompiler {
    calls: Arc<Mutex<Vec<PathBuf>>>,
}

impl FakeCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

impl StylesheetCompiler for FakeCompiler {
    fn compile(&self, source: &Path, options: &CompileOptions) -> Result<Vec<u8>> {
        self.calls.lock().unwrap().push(source.to_path_buf());
        if source.to_string_lossy().contains("broken") {
            return Err(StylewatchError::CompileError(format!(
                "{}: expected \"}}\"",
                source.display()
            )));
        }
        Ok(format!("/* {} */\n", options.output_style()).into_bytes())
    }
}

/// A fake backend that:
/// - records every compile request it receives
/// - immediately reports `CompileFinished` with the next scripted outcome
///   (`Success` once the script runs out).
pub struct FakeCompileBackend {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    requests: Arc<Mutex<Vec<CompileRequest>>>,
    script: VecDeque<CompileOutcome>,
}

impl FakeCompileBackend {
    pub fn new(
        runtime_tx: mpsc::Sender<RuntimeEvent>,
        requests: Arc<Mutex<Vec<CompileRequest>>>,
    ) -> Self {
        Self {
            runtime_tx,
            requests,
            script: VecDeque::new(),
        }
    }

    pub fn with_outcomes(mut self, outcomes: impl IntoIterator<Item = CompileOutcome>) -> Self {
        self.script.extend(outcomes);
        self
    }
}

impl CompileBackend for FakeCompileBackend {
    fn dispatch(
        &mut self,
        request: CompileRequest,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let requests = Arc::clone(&self.requests);
        let outcome = self.script.pop_front().unwrap_or(CompileOutcome::Success);

        Box::pin(async move {
            let run_id = request.run_id;
            requests.lock().unwrap().push(request);

            tx.send(RuntimeEvent::CompileFinished { run_id, outcome })
                .await
                .map_err(anyhow::Error::from)?;
            Ok(())
        })
    }
}
