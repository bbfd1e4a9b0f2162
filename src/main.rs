// src/main.rs

use stylewatch::{RunStatus, cli, logging, run};

/// Conventional exit status for a process stopped by SIGINT.
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(RunStatus::Completed) => {}
        Ok(RunStatus::Interrupted) => std::process::exit(INTERRUPTED_EXIT_CODE),
        Err(err) => {
            eprintln!("stylewatch error: {err:#}");
            std::process::exit(1);
        }
    }
}

async fn run_main() -> anyhow::Result<RunStatus> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args).await
}
