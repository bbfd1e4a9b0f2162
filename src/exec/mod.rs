// src/exec/mod.rs

//! Compile execution layer.
//!
//! - [`runner`] runs one compile on the blocking thread pool and turns its
//!   result into a `CompileOutcome`, logging any error.
//! - [`backend`] provides the `CompileBackend` trait and the production
//!   `RealCompileBackend`, which tests replace with a fake.

pub mod backend;
pub mod runner;

pub use backend::{CompileBackend, RealCompileBackend};
pub use runner::run_compile;
