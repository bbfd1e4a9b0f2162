// src/engine/queue.rs

use std::collections::{BTreeSet, VecDeque};
use std::path::PathBuf;

use tracing::{debug, warn};

use super::TriggerReason;
use crate::types::BusyPolicy;

/// Changes waiting for a future compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCompile {
    pub paths: BTreeSet<PathBuf>,
    pub reason: TriggerReason,
}

impl PendingCompile {
    pub fn new(paths: impl IntoIterator<Item = PathBuf>, reason: TriggerReason) -> Self {
        Self {
            paths: paths.into_iter().collect(),
            reason,
        }
    }
}

/// Queue of changes that arrive while a compile is already running.
///
/// - `Coalesce`: there is at most one pending compile; every new change is
///   merged into it. A burst of N saves during a compile therefore costs
///   exactly one follow-up compile.
/// - `Serialize`: every change batch becomes its own pending compile, run in
///   arrival order. At most `max_pending` are kept; when exceeded the oldest
///   are dropped, since a later compile covers their content anyway.
#[derive(Debug)]
pub struct TriggerQueue {
    policy: BusyPolicy,
    max_pending: usize,
    pending: VecDeque<PendingCompile>,
}

impl TriggerQueue {
    /// `max_pending` is clamped to at least 1.
    pub fn new(policy: BusyPolicy, max_pending: usize) -> Self {
        Self {
            policy,
            max_pending: max_pending.max(1),
            pending: VecDeque::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Record a change batch that arrived mid-compile.
    pub fn record(&mut self, paths: Vec<PathBuf>, reason: TriggerReason) {
        match self.policy {
            BusyPolicy::Coalesce => {
                if let Some(pending) = self.pending.back_mut() {
                    let before = pending.paths.len();
                    pending.paths.extend(paths);
                    debug!(
                        added = pending.paths.len() - before,
                        total = pending.paths.len(),
                        "coalesced change into pending compile"
                    );
                } else {
                    self.pending.push_back(PendingCompile::new(paths, reason));
                    debug!("queued follow-up compile (coalesce)");
                }
            }
            BusyPolicy::Serialize => {
                self.pending.push_back(PendingCompile::new(paths, reason));
                if self.pending.len() > self.max_pending {
                    warn!(
                        pending = self.pending.len(),
                        max_pending = self.max_pending,
                        "queue_length exceeded; dropping oldest pending compiles"
                    );
                    while self.pending.len() > self.max_pending {
                        self.pending.pop_front();
                    }
                }
                debug!(pending = self.pending.len(), "queued follow-up compile (serialize)");
            }
        }
    }

    /// Take the next compile to run, if any.
    pub fn pop_next(&mut self) -> Option<PendingCompile> {
        self.pending.pop_front()
    }

    /// Drop everything pending; returns how many compiles were discarded.
    pub fn clear(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    #[test]
    fn coalesce_merges_everything_into_one_pending_compile() {
        let mut q = TriggerQueue::new(BusyPolicy::Coalesce, 5);
        q.record(vec![p("scss/a.scss")], TriggerReason::FileWatch);
        q.record(vec![p("scss/b.scss"), p("scss/a.scss")], TriggerReason::FileWatch);
        q.record(vec![p("scss/c.scss")], TriggerReason::FileWatch);

        assert_eq!(q.len(), 1);
        let next = q.pop_next().unwrap();
        assert_eq!(
            next.paths.into_iter().collect::<Vec<_>>(),
            vec![p("scss/a.scss"), p("scss/b.scss"), p("scss/c.scss")]
        );
        assert!(q.is_empty());
    }

    #[test]
    fn serialize_keeps_arrival_order() {
        let mut q = TriggerQueue::new(BusyPolicy::Serialize, 3);
        q.record(vec![p("1")], TriggerReason::FileWatch);
        q.record(vec![p("2")], TriggerReason::FileWatch);

        assert_eq!(q.len(), 2);
        assert!(q.pop_next().unwrap().paths.contains(&p("1")));
        assert!(q.pop_next().unwrap().paths.contains(&p("2")));
        assert!(q.pop_next().is_none());
    }

    #[test]
    fn serialize_drops_oldest_beyond_limit() {
        let mut q = TriggerQueue::new(BusyPolicy::Serialize, 2);
        for name in ["1", "2", "3"] {
            q.record(vec![p(name)], TriggerReason::FileWatch);
        }

        assert_eq!(q.len(), 2);
        assert!(q.pop_next().unwrap().paths.contains(&p("2")));
        assert!(q.pop_next().unwrap().paths.contains(&p("3")));
    }

    #[test]
    fn zero_limit_is_clamped_and_clear_reports_dropped() {
        let mut q = TriggerQueue::new(BusyPolicy::Serialize, 0);
        q.record(vec![p("1")], TriggerReason::FileWatch);
        q.record(vec![p("2")], TriggerReason::FileWatch);

        assert_eq!(q.len(), 1);
        assert_eq!(q.clear(), 1);
        assert!(q.is_empty());
    }
}
