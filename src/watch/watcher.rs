// src/watch/watcher.rs

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, warn};

use crate::config::WatchConfig;
use crate::engine::RuntimeEvent;
use crate::fs::FileSystem;
use crate::watch::event_handler::{WatchContext, process_batch};
use crate::watch::hash::SourceFingerprint;
use crate::watch::patterns::SourcePatterns;

/// Watcher tuning taken from `[watch]`.
#[derive(Debug, Clone, Copy)]
pub struct WatchOptions {
    /// Events arriving within this window after the first one are handled
    /// as a single batch. Zero disables batching.
    pub debounce: Duration,
    pub use_hash: bool,
}

impl WatchOptions {
    pub fn from_config(watch: &WatchConfig) -> Self {
        Self {
            debounce: Duration::from_millis(watch.debounce_ms),
            use_hash: watch.use_hash,
        }
    }
}

/// Owned watch subscription.
///
/// Open while this handle lives. [`close`](Self::close) releases it
/// explicitly; dropping the handle releases it too.
pub struct WatcherHandle {
    watcher: RecommendedWatcher,
    root: PathBuf,
    forwarder: JoinHandle<()>,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl WatcherHandle {
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Unsubscribe and stop forwarding events.
    pub fn close(mut self) {
        if let Err(err) = self.watcher.unwatch(&self.root) {
            debug!("unwatch of {:?} failed: {err}", self.root);
        }
        self.forwarder.abort();
        info!("file watcher closed on {:?}", self.root);
    }
}

/// Watch `root` recursively and send `RuntimeEvent::SourcesChanged` for
/// every batch of changes to files matched by `patterns`.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    patterns: SourcePatterns,
    options: WatchOptions,
    fs: Arc<dyn FileSystem>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();
    // Canonicalize once so relative paths are computed against a stable base.
    let root = root.canonicalize().unwrap_or(root);
    let patterns = Arc::new(patterns);

    let fingerprint = if options.use_hash {
        let mut fp = SourceFingerprint::new();
        if let Err(err) = fp.seed(fs.as_ref(), &root, &patterns) {
            warn!("failed to seed source fingerprint: {err:#}");
        }
        Some(Arc::new(Mutex::new(fp)))
    } else {
        None
    };

    // Channel from the blocking notify callback into the async world.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                // Receiver gone means the forwarder stopped; nothing to do.
                let _ = event_tx.send(event);
            }
            Err(err) => {
                warn!("file watch error: {err}");
            }
        },
        Config::default(),
    )
    .context("creating filesystem watcher")?;

    watcher
        .watch(&root, RecursiveMode::Recursive)
        .with_context(|| format!("watching {:?}", root))?;

    info!(sources = ?patterns.sources(), "file watcher started on {:?}", root);

    let ctx = WatchContext {
        root: root.clone(),
        patterns,
        fs,
        fingerprint,
    };
    let forwarder = tokio::spawn(forward_events(ctx, event_rx, options.debounce, runtime_tx));

    Ok(WatcherHandle {
        watcher,
        root,
        forwarder,
    })
}

async fn forward_events(
    ctx: WatchContext,
    mut event_rx: mpsc::UnboundedReceiver<Event>,
    debounce: Duration,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) {
    while let Some(first) = event_rx.recv().await {
        let mut batch = vec![first];

        if !debounce.is_zero() {
            let deadline = Instant::now() + debounce;
            while let Ok(Some(event)) = timeout_at(deadline, event_rx.recv()).await {
                batch.push(event);
            }
        }

        debug!(events = batch.len(), "processing notify batch");
        if !process_batch(&ctx, batch, &runtime_tx).await {
            break;
        }
    }
    debug!("watcher event loop finished");
}
