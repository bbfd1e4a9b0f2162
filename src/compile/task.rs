// src/compile/task.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::compile::compiler::StylesheetCompiler;
use crate::compile::options::CompileOptions;
use crate::config::StylesConfig;
use crate::errors::{Result, StylewatchError};
use crate::fs::FileSystem;

/// Result of a successful compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileReport {
    pub output: PathBuf,
    pub bytes: usize,
}

/// One entry stylesheet compiled into one CSS file.
///
/// `run` never panics and never leaves partial output behind: either the
/// destination file is replaced as a whole, or it is left as it was and an
/// error is returned for the caller to report.
#[derive(Debug, Clone)]
pub struct CompileTask {
    entry: PathBuf,
    dest_dir: PathBuf,
    options: CompileOptions,
    compiler: Arc<dyn StylesheetCompiler>,
    fs: Arc<dyn FileSystem>,
}

impl CompileTask {
    pub fn new(
        entry: impl Into<PathBuf>,
        dest_dir: impl Into<PathBuf>,
        options: CompileOptions,
        compiler: Arc<dyn StylesheetCompiler>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            entry: entry.into(),
            dest_dir: dest_dir.into(),
            options,
            compiler,
            fs,
        }
    }

    /// Build a task from the validated `[styles]` section.
    pub fn from_config(
        styles: &StylesConfig,
        compiler: Arc<dyn StylesheetCompiler>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        Self::new(
            styles.entry.clone(),
            styles.dest.clone(),
            styles.options.clone(),
            compiler,
            fs,
        )
    }

    pub fn entry(&self) -> &Path {
        &self.entry
    }

    /// `<dest>/<entry stem>.css`
    pub fn output_path(&self) -> PathBuf {
        let stem = self
            .entry
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "out".to_string());
        self.dest_dir.join(format!("{stem}.css"))
    }

    pub fn run(&self) -> Result<CompileReport> {
        if !self.fs.is_file(&self.entry) {
            return Err(StylewatchError::NotFound(self.entry.clone()));
        }

        debug!(entry = %self.entry.display(), "compiling entry stylesheet");
        let css = self.compiler.compile(&self.entry, &self.options)?;

        let output = self.output_path();
        self.fs
            .write_atomic(&output, &css)
            .map_err(|e| StylewatchError::OutputError(format!("{e:#}")))?;

        info!(
            entry = %self.entry.display(),
            output = %output.display(),
            bytes = css.len(),
            "compiled stylesheet"
        );

        Ok(CompileReport {
            output,
            bytes: css.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::fs::mock::MockFileSystem;

    /// Echoes the source back, or fails on sources containing `!error`.
    #[derive(Debug, Default)]
    struct EchoCompiler {
        calls: AtomicUsize,
        fs: MockFileSystem,
    }

    impl StylesheetCompiler for EchoCompiler {
        fn compile(&self, source: &Path, _options: &CompileOptions) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let src = self.fs.contents(source).unwrap_or_default();
            if String::from_utf8_lossy(&src).contains("!error") {
                return Err(StylewatchError::CompileError("boom".to_string()));
            }
            Ok(src)
        }
    }

    fn task_with(fs: &MockFileSystem, compiler: Arc<EchoCompiler>) -> CompileTask {
        CompileTask::new(
            "scss/main.scss",
            "public",
            CompileOptions::default(),
            compiler,
            Arc::new(fs.clone()),
        )
    }

    #[test]
    fn missing_entry_is_not_found_and_compiler_is_not_called() {
        let fs = MockFileSystem::new();
        let compiler = Arc::new(EchoCompiler {
            fs: fs.clone(),
            ..Default::default()
        });
        let task = task_with(&fs, Arc::clone(&compiler));

        let err = task.run().unwrap_err();

        assert!(matches!(err, StylewatchError::NotFound(ref p) if p == Path::new("scss/main.scss")));
        assert_eq!(compiler.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn success_writes_stem_named_css_into_dest() {
        let fs = MockFileSystem::new();
        fs.add_file("scss/main.scss", "a { b: c }");
        let compiler = Arc::new(EchoCompiler {
            fs: fs.clone(),
            ..Default::default()
        });

        let report = task_with(&fs, compiler).run().unwrap();

        assert_eq!(report.output, PathBuf::from("public/main.css"));
        assert_eq!(report.bytes, 10);
        assert_eq!(fs.contents("public/main.css").unwrap(), b"a { b: c }");
    }

    #[test]
    fn compile_failure_keeps_previous_output() {
        let fs = MockFileSystem::new();
        fs.add_file("scss/main.scss", "a { !error }");
        fs.add_file("public/main.css", "previous");
        let compiler = Arc::new(EchoCompiler {
            fs: fs.clone(),
            ..Default::default()
        });

        let err = task_with(&fs, compiler).run().unwrap_err();

        assert!(matches!(err, StylewatchError::CompileError(_)));
        assert_eq!(fs.contents("public/main.css").unwrap(), b"previous");
        assert_eq!(fs.write_count(), 0);
    }

    #[test]
    fn unwritable_destination_is_an_output_error() {
        let fs = MockFileSystem::new();
        fs.add_file("scss/main.scss", "a {}");
        fs.deny_writes_under("public");
        let compiler = Arc::new(EchoCompiler {
            fs: fs.clone(),
            ..Default::default()
        });

        let err = task_with(&fs, compiler).run().unwrap_err();

        match err {
            StylewatchError::OutputError(msg) => assert!(msg.contains("Permission denied")),
            other => panic!("expected OutputError, got {other:?}"),
        }
    }
}
