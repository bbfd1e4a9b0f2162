// tests/fs_abstraction.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;

use stylewatch::compile::{CompileOptions, CompileTask};
use stylewatch::engine::{CompileOutcome, CompileRequest, RuntimeEvent, TriggerReason};
use stylewatch::errors::StylewatchError;
use stylewatch::exec::run_compile;
use stylewatch::fs::mock::MockFileSystem;
use stylewatch::types::OutputStyle;
use stylewatch::watch::{SourceFingerprint, SourcePatterns, collect_matching_files};
use stylewatch_test_utils::fakes::FakeCompiler;
use stylewatch_test_utils::{init_tracing, with_timeout};

fn task(entry: &str, dest: &str, compiler: &FakeCompiler, fs: &MockFileSystem) -> CompileTask {
    let options = CompileOptions::new(OutputStyle::Compact, 10, vec![PathBuf::from(".")]).unwrap();
    CompileTask::new(
        entry,
        dest,
        options,
        Arc::new(compiler.clone()),
        Arc::new(fs.clone()),
    )
}

#[test]
fn compile_task_writes_through_the_filesystem_abstraction() {
    let fs = MockFileSystem::new();
    fs.add_file("scss/main.scss", "body {}");
    let compiler = FakeCompiler::new();

    let report = task("scss/main.scss", "public", &compiler, &fs).run().unwrap();

    assert_eq!(report.output, PathBuf::from("public/main.css"));
    assert_eq!(
        fs.contents("public/main.css").as_deref(),
        Some(&b"/* compact */\n"[..])
    );
    assert_eq!(compiler.calls(), vec![PathBuf::from("scss/main.scss")]);
}

#[test]
fn compiler_rejection_leaves_destination_untouched() {
    let fs = MockFileSystem::new();
    fs.add_file("scss/broken.scss", "body {");
    let compiler = FakeCompiler::new();

    let err = task("scss/broken.scss", ".", &compiler, &fs).run().unwrap_err();

    assert!(matches!(err, StylewatchError::CompileError(_)), "got {err:?}");
    assert_eq!(fs.write_count(), 0);
}

#[test]
fn denied_destination_is_output_error() {
    let fs = MockFileSystem::new();
    fs.add_file("scss/main.scss", "body {}");
    fs.deny_writes_under("readonly");
    let compiler = FakeCompiler::new();

    let err = task("scss/main.scss", "readonly", &compiler, &fs).run().unwrap_err();

    assert!(matches!(err, StylewatchError::OutputError(_)), "got {err:?}");
    assert!(fs.contents("readonly/main.css").is_none());
}

#[test]
fn missing_entry_never_reaches_the_compiler() {
    let fs = MockFileSystem::new();
    let compiler = FakeCompiler::new();

    let err = task("scss/main.scss", ".", &compiler, &fs).run().unwrap_err();

    assert!(matches!(err, StylewatchError::NotFound(_)), "got {err:?}");
    assert!(compiler.calls().is_empty());
}

#[test]
fn source_listing_and_fingerprint_use_the_mock() {
    let fs = MockFileSystem::new();
    fs.add_file("./scss/main.scss", "body {}");
    fs.add_file("./scss/_vars.scss", "$a: 1;");
    fs.add_file("./scss/notes.md", "ignored");
    fs.add_file("./scss/vendor/_reset.scss", "not matched by scss/*.scss");

    let patterns = SourcePatterns::new(&["scss/*.scss".to_string()], &[]).unwrap();
    let files = collect_matching_files(&fs, Path::new("."), &patterns).unwrap();
    let names: Vec<String> = files
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["_vars.scss", "main.scss"]);

    let mut fp = SourceFingerprint::new();
    fp.seed(&fs, Path::new("."), &patterns).unwrap();
    assert!(!fp.refresh(&fs, Path::new("."), &patterns).unwrap());

    fs.add_file("./scss/_vars.scss", "$a: 2;");
    assert!(fp.refresh(&fs, Path::new("."), &patterns).unwrap());
}

#[tokio::test]
async fn runner_reports_failure_as_outcome() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("scss/broken.scss", "body {");
    let compiler = FakeCompiler::new();
    let task = Arc::new(task("scss/broken.scss", ".", &compiler, &fs));

    let (tx, mut rx) = mpsc::channel(4);
    let request = CompileRequest {
        run_id: 7,
        changed: vec![PathBuf::from("scss/broken.scss")],
        reason: TriggerReason::FileWatch,
    };
    run_compile(task, request, tx).await;

    match with_timeout(rx.recv()).await {
        Some(RuntimeEvent::CompileFinished { run_id, outcome }) => {
            assert_eq!(run_id, 7);
            assert_eq!(outcome, CompileOutcome::Failed);
        }
        other => panic!("expected CompileFinished, got {other:?}"),
    }
}
