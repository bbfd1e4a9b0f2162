// src/compile/compiler.rs

//! Stylesheet compilation capability.
//!
//! The rest of the crate only talks to [`StylesheetCompiler`]; the concrete
//! SCSS implementation is [`RsassCompiler`]. Tests substitute a fake.

use std::fmt::Debug;
use std::path::Path;

use rsass::input::FsContext;
use rsass::output::{Format, Style};
use tracing::debug;

use crate::compile::format::compact;
use crate::compile::options::CompileOptions;
use crate::errors::{Result, StylewatchError};
use crate::types::OutputStyle;

/// Turns one source stylesheet into CSS bytes.
///
/// Implementations must not write anything; the compile task owns output.
/// Rejections of the input are reported as `StylewatchError::CompileError`.
pub trait StylesheetCompiler: Send + Sync + Debug {
    fn compile(&self, source: &Path, options: &CompileOptions) -> Result<Vec<u8>>;
}

/// SCSS compiler backed by `rsass`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RsassCompiler;

impl RsassCompiler {
    pub fn new() -> Self {
        Self
    }
}

impl StylesheetCompiler for RsassCompiler {
    fn compile(&self, source: &Path, options: &CompileOptions) -> Result<Vec<u8>> {
        let format = Format {
            style: rsass_style(options.output_style()),
            precision: options.precision(),
            ..Default::default()
        };

        let (mut context, file) = FsContext::for_path(source)
            .map_err(|e| StylewatchError::CompileError(e.to_string()))?;
        for dir in options.include_paths() {
            context.push_path(dir);
        }

        debug!(
            source = %source.display(),
            style = %options.output_style(),
            precision = options.precision(),
            "invoking rsass"
        );

        let css = context
            .with_format(format)
            .transform(file)
            .map_err(|e| StylewatchError::CompileError(e.to_string()))?;

        match options.output_style() {
            OutputStyle::Compact => {
                let text = String::from_utf8(css).map_err(|e| {
                    StylewatchError::CompileError(format!("compiler produced invalid UTF-8: {e}"))
                })?;
                Ok(compact(&text).into_bytes())
            }
            _ => Ok(css),
        }
    }
}

/// rsass only knows the two modern styles; `nested` and `compact` are
/// produced from expanded output.
fn rsass_style(style: OutputStyle) -> Style {
    match style {
        OutputStyle::Compressed => Style::Compressed,
        OutputStyle::Nested | OutputStyle::Compact | OutputStyle::Expanded => Style::Expanded,
    }
}
