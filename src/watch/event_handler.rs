// src/watch/event_handler.rs

//! Turns batches of raw notify events into `SourcesChanged` runtime events.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use notify::Event;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::{RuntimeEvent, TriggerReason};
use crate::fs::FileSystem;
use crate::watch::hash::SourceFingerprint;
use crate::watch::patterns::{SourcePatterns, relative_str};

/// Everything the forwarding task needs to judge a batch.
#[derive(Debug, Clone)]
pub struct WatchContext {
    pub root: PathBuf,
    pub patterns: Arc<SourcePatterns>,
    pub fs: Arc<dyn FileSystem>,
    /// Present when `use_hash = true`.
    pub fingerprint: Option<Arc<Mutex<SourceFingerprint>>>,
}

/// Relative paths of watched sources touched by `events`, deduplicated and
/// sorted. Access-only events (open, read, close) are ignored.
pub fn relevant_paths(root: &Path, patterns: &SourcePatterns, events: &[Event]) -> Vec<PathBuf> {
    let mut paths = BTreeSet::new();

    for event in events {
        if event.kind.is_access() {
            continue;
        }
        for path in &event.paths {
            let Some(rel) = relative_str(root, path) else {
                debug!(?path, ?root, "event path outside watch root");
                continue;
            };
            if patterns.matches(&rel) {
                paths.insert(PathBuf::from(rel));
            }
        }
    }

    paths.into_iter().collect()
}

/// Process one batch of notify events.
///
/// Returns false once the runtime channel is closed, telling the caller to
/// stop forwarding.
pub async fn process_batch(
    ctx: &WatchContext,
    events: Vec<Event>,
    runtime_tx: &mpsc::Sender<RuntimeEvent>,
) -> bool {
    let paths = relevant_paths(&ctx.root, &ctx.patterns, &events);
    if paths.is_empty() {
        return true;
    }

    if !content_changed(ctx).await {
        info!(?paths, "sources touched but content unchanged; skipping compile");
        return true;
    }

    debug!(?paths, "source change -> requesting compile");
    if let Err(err) = runtime_tx
        .send(RuntimeEvent::SourcesChanged {
            paths,
            reason: TriggerReason::FileWatch,
        })
        .await
    {
        warn!("failed to send RuntimeEvent::SourcesChanged: {err}");
        return false;
    }
    true
}

/// With hashing disabled every relevant batch counts as a change. Hashing
/// errors also count as a change, so a compile is never lost to them.
async fn content_changed(ctx: &WatchContext) -> bool {
    let Some(fingerprint) = ctx.fingerprint.clone() else {
        return true;
    };
    let fs = Arc::clone(&ctx.fs);
    let root = ctx.root.clone();
    let patterns = Arc::clone(&ctx.patterns);

    tokio::task::spawn_blocking(move || {
        let mut fingerprint = match fingerprint.lock() {
            Ok(guard) => guard,
            Err(_) => {
                warn!("fingerprint mutex poisoned; compiling anyway");
                return true;
            }
        };
        match fingerprint.refresh(fs.as_ref(), &root, &patterns) {
            Ok(changed) => changed,
            Err(err) => {
                warn!(error = %format!("{err:#}"), "failed to fingerprint sources; compiling anyway");
                true
            }
        }
    })
    .await
    .unwrap_or(true)
}
