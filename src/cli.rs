// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `stylewatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "stylewatch",
    version,
    about = "Compile an SCSS entry stylesheet and recompile it when sources change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// When omitted, `Stylewatch.toml` in the current directory is used if it
    /// exists; otherwise built-in defaults apply.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `STYLEWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// Load + validate the config, print it, and exit without compiling.
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Compile the entry stylesheet once.
    Styles,

    /// Watch source stylesheets and recompile on every change.
    Watch {
        /// Compile once at startup before waiting for changes.
        #[arg(long)]
        initial: bool,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_styles_with_global_flags_after_subcommand() {
        let args = CliArgs::try_parse_from([
            "stylewatch",
            "styles",
            "--config",
            "site/Stylewatch.toml",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert!(matches!(args.command, Command::Styles));
        assert_eq!(args.config.as_deref(), Some("site/Stylewatch.toml"));
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
        assert!(!args.dry_run);
    }

    #[test]
    fn parses_watch_initial() {
        let args = CliArgs::try_parse_from(["stylewatch", "watch", "--initial"]).unwrap();
        assert!(matches!(args.command, Command::Watch { initial: true }));
    }

    #[test]
    fn subcommand_is_required() {
        assert!(CliArgs::try_parse_from(["stylewatch"]).is_err());
    }
}
