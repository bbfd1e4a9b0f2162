// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Compiling the `sources` / `exclude` glob patterns.
//! - Owning the cross-platform filesystem subscription (`notify`).
//! - Batching raw events and (optionally) suppressing batches that leave the
//!   watched content unchanged.
//!
//! It knows nothing about compiling; it only turns filesystem changes into
//! `RuntimeEvent::SourcesChanged`.

pub mod event_handler;
pub mod hash;
pub mod patterns;
pub mod watcher;

pub use hash::{SourceFingerprint, compute_aggregate_hash, compute_file_hash};
pub use patterns::{SourcePatterns, collect_matching_files, relative_str};
pub use watcher::{WatchOptions, WatcherHandle, spawn_watcher};
