use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod config;
mod logging;

/// Rebuild an artifact only when its inputs changed.
///
/// Rebundle fingerprints the configured input files, compares the result with
/// the fingerprint recorded by the last successful build, and runs the
/// toolchain steps from rebundle.toml only when something changed.
///
/// EXAMPLES:
///     rebundle build               Rebuild if inputs changed
///     rebundle build --force       Rebuild unconditionally
///     rebundle status              Show what build would do
///     rebundle hash                Print the current input fingerprint
///     rebundle clean               Forget the recorded fingerprint
///
/// ENVIRONMENT VARIABLES:
///     REBUNDLE_JSON             Set to '1' for JSON output by default
///     REBUNDLE_LOG              Log filter (e.g. 'debug'); falls back to RUST_LOG
///     REBUNDLE_RECORD           Override the fingerprint record path
///     REBUNDLE_ARTIFACT         Override the artifact path
///     REBUNDLE_EXCLUDE_HIDDEN   Set to '1' to skip dot-files in input directories
///     NO_COLOR                  Set to disable colored output
#[derive(Parser)]
#[command(name = "rebundle")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to rebundle.toml (default: search upward from the working directory)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Directory to start the rebundle.toml search from
    #[arg(long = "directory", short = 'C', global = true)]
    directory: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the artifact if its inputs changed
    ///
    /// Exits 0 when the artifact was rebuilt, was already up to date, or
    /// sources are missing but a prebuilt artifact exists. Exits 1 otherwise.
    ///
    /// EXAMPLES:
    ///     rebundle build               Gated build
    ///     rebundle build --force       Ignore the recorded fingerprint
    ///     rebundle build --json        Print the outcome as JSON
    #[command(visible_alias = "b")]
    Build {
        /// Rebuild even if inputs are unchanged
        #[arg(long, short = 'f')]
        force: bool,
        /// JSON output
        #[arg(long)]
        json: bool,
    },

    /// Show whether a build would run, without running it
    ///
    /// EXAMPLES:
    ///     rebundle status              Human-readable summary
    ///     rebundle status --json       Machine-readable summary
    #[command(visible_alias = "s")]
    Status {
        /// JSON output
        #[arg(long)]
        json: bool,
    },

    /// Print the fingerprint of the current inputs
    Hash,

    /// Delete the recorded fingerprint so the next build runs
    Clean,

    /// Generate shell completions
    ///
    /// EXAMPLES:
    ///     rebundle completions bash > ~/.local/share/bash-completion/completions/rebundle
    ///     rebundle completions zsh > ~/.zfunc/_rebundle
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> ExitCode {
    // Usage errors exit 1 like every other failure; help and version exit 0
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    let cli_config = config::Config::from_env();
    logging::init(&cli_config);

    if cli_config.no_color {
        colored::control::set_override(false);
    }

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "rebundle", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    let project = match commands::load_project(cli.config.as_deref(), cli.directory.as_deref()) {
        Ok(project) => project,
        Err(err) => {
            commands::report_failure(&err, None);
            return ExitCode::FAILURE;
        }
    };
    let hint = project.project.bundle.hint.clone();

    let result = match cli.command {
        Commands::Build { force, json } => {
            let args = commands::build::BuildArgs {
                force,
                json: json || cli_config.default_json,
            };
            commands::build::run(&project, args)
        }
        Commands::Status { json } => {
            commands::status::run(&project, json || cli_config.default_json)
        }
        Commands::Hash => commands::hash::run(&project),
        Commands::Clean => commands::clean::run(&project),
        Commands::Completions { .. } => unreachable!("handled before loading the project"),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            commands::report_failure(&err, hint.as_deref());
            ExitCode::FAILURE
        }
    }
}
