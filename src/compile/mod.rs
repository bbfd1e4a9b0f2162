// src/compile/mod.rs

//! The compile task: SCSS entry in, CSS file out.
//!
//! - [`options`] holds the validated compiler settings.
//! - [`compiler`] defines the `StylesheetCompiler` capability and its
//!   `rsass`-backed implementation.
//! - [`format`] reflows expanded CSS into the `compact` style.
//! - [`task`] ties a compiler, an entry and a destination together and
//!   writes the output atomically.

pub mod compiler;
pub mod format;
pub mod options;
pub mod task;

pub use compiler::{RsassCompiler, StylesheetCompiler};
pub use options::{CompileOptions, MAX_PRECISION};
pub use task::{CompileReport, CompileTask};
