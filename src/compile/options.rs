// src/compile/options.rs

use std::path::{Path, PathBuf};

use crate::errors::{Result, StylewatchError};
use crate::types::OutputStyle;

/// Largest accepted `precision`. The compiler reserves a buffer of this
/// many digits for every fractional number it prints.
pub const MAX_PRECISION: usize = 100;

/// Settings handed to the compiler on every run.
///
/// Construct through [`CompileOptions::new`], which only accepts a
/// precision in `1..=MAX_PRECISION`, so a value of this type is always
/// usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    output_style: OutputStyle,
    precision: usize,
    include_paths: Vec<PathBuf>,
}

impl CompileOptions {
    pub fn new(
        output_style: OutputStyle,
        precision: i64,
        include_paths: Vec<PathBuf>,
    ) -> Result<Self> {
        let precision = usize::try_from(precision)
            .ok()
            .filter(|p| (1..=MAX_PRECISION).contains(p))
            .ok_or_else(|| {
                StylewatchError::ConfigError(format!(
                    "precision must be between 1 and {MAX_PRECISION} (got {precision})"
                ))
            })?;

        Ok(Self {
            output_style,
            precision,
            include_paths,
        })
    }

    pub fn output_style(&self) -> OutputStyle {
        self.output_style
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Import search path, in resolution order.
    pub fn include_paths(&self) -> &[PathBuf] {
        &self.include_paths
    }

    /// Same options with relative include paths resolved against `root`.
    pub fn rooted_at(&self, root: &Path) -> CompileOptions {
        CompileOptions {
            include_paths: self.include_paths.iter().map(|p| root.join(p)).collect(),
            ..self.clone()
        }
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            output_style: OutputStyle::Nested,
            precision: 10,
            include_paths: vec![PathBuf::from(".")],
        }
    }
}
