// src/lib.rs

pub mod cli;
pub mod compile;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::cli::{CliArgs, Command};
use crate::compile::{CompileReport, CompileTask, RsassCompiler};
use crate::config::{ConfigFile, load_for_cli, project_root};
use crate::engine::{CoreRuntime, Runtime, RuntimeEvent, TriggerReason};
use crate::exec::RealCompileBackend;
use crate::fs::{FileSystem, RealFileSystem};
use crate::watch::{SourcePatterns, WatchOptions, spawn_watcher};

/// How a successful invocation ended. Errors are reported through `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The command ran to its natural end.
    Completed,
    /// The watch session was stopped by Ctrl-C.
    Interrupted,
}

/// High-level entry point used by `main.rs`.
///
/// Loads the config, resolves paths against the project root, and runs the
/// requested subcommand.
pub async fn run(args: CliArgs) -> Result<RunStatus> {
    let explicit = args.config.as_deref().map(Path::new);
    let (cfg, config_path) = load_for_cli(explicit)?;
    let root = project_root(config_path.as_deref());
    let cfg = cfg.rooted_at(&root);

    if args.dry_run {
        print_dry_run(&cfg, config_path.as_deref(), &root);
        return Ok(RunStatus::Completed);
    }

    match args.command {
        Command::Styles => {
            run_styles(&cfg)?;
            Ok(RunStatus::Completed)
        }
        Command::Watch { initial } => run_watch(&cfg, root, initial).await,
    }
}

fn compile_task(cfg: &ConfigFile) -> CompileTask {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    CompileTask::from_config(cfg.styles(), Arc::new(RsassCompiler::new()), fs)
}

/// One-shot compile (`stylewatch styles`).
pub fn run_styles(cfg: &ConfigFile) -> crate::errors::Result<CompileReport> {
    compile_task(cfg).run()
}

/// Watch session (`stylewatch watch`). Runs until Ctrl-C.
pub async fn run_watch(cfg: &ConfigFile, root: PathBuf, initial: bool) -> Result<RunStatus> {
    let watch_cfg = cfg.watch();
    let patterns = SourcePatterns::from_config(watch_cfg)?;

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    let task = Arc::new(compile_task(cfg));
    let backend = RealCompileBackend::new(task, rt_tx.clone());

    let watcher = spawn_watcher(
        root,
        patterns,
        WatchOptions::from_config(watch_cfg),
        Arc::new(RealFileSystem),
        rt_tx.clone(),
    )?;

    // Ctrl-C -> graceful shutdown.
    let (interrupted_tx, mut interrupted_rx) = tokio::sync::oneshot::channel::<()>();
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("failed to listen for Ctrl+C: {e}");
                return;
            }
            info!("Ctrl+C received; shutting down");
            let _ = interrupted_tx.send(());
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    if initial {
        rt_tx
            .send(RuntimeEvent::SourcesChanged {
                paths: Vec::new(),
                reason: TriggerReason::Manual,
            })
            .await?;
    }
    drop(rt_tx);

    let core = CoreRuntime::new(watch_cfg.on_busy, watch_cfg.queue_length);
    let runtime = Runtime::new(core, rt_rx, backend);
    let result = runtime.run().await;

    watcher.close();
    result?;

    if interrupted_rx.try_recv().is_ok() {
        Ok(RunStatus::Interrupted)
    } else {
        Ok(RunStatus::Completed)
    }
}

/// Print the effective configuration without compiling anything.
fn print_dry_run(cfg: &ConfigFile, config_path: Option<&Path>, root: &Path) {
    let styles = cfg.styles();
    let watch = cfg.watch();

    println!("stylewatch dry-run");
    match config_path {
        Some(path) => println!("  config file = {}", path.display()),
        None => println!("  config file = (none, built-in defaults)"),
    }
    println!("  project root = {}", root.display());
    println!();

    println!("styles:");
    println!("  entry = {}", styles.entry.display());
    println!("  dest = {}", styles.dest.display());
    println!("  output_style = {}", styles.options.output_style());
    println!("  precision = {}", styles.options.precision());
    println!("  include_paths:");
    for path in styles.options.include_paths() {
        println!("    - {}", path.display());
    }
    println!();

    println!("watch:");
    println!("  sources = {:?}", watch.sources);
    if !watch.exclude.is_empty() {
        println!("  exclude = {:?}", watch.exclude);
    }
    println!("  use_hash = {}", watch.use_hash);
    println!("  debounce_ms = {}", watch.debounce_ms);
    println!("  on_busy = {:?}", watch.on_busy);
    println!("  queue_length = {}", watch.queue_length);

    debug!("dry-run complete (no compile)");
}
