mod commands;
mod error;
mod util;

use anyhow::{Context as _, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::generate;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{users, Context};
use crate::error::{exit_code_for, report_error};
use roster_config as config;
use roster_store::{Directory, UserNew};

#[derive(Debug, Parser)]
#[command(name = "roster", version, about = "roster CLI")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Add(users::AddArgs),
    Show(users::ShowArgs),
    Search(users::SearchArgs),
    List,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    match command {
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout().lock());
            Ok(())
        }
        command => {
            let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
            if verbose {
                match config::resolve_config_path(config_path) {
                    Ok(path) => {
                        if path.exists() {
                            debug!(path = %path.display(), "config resolved");
                        } else {
                            debug!(path = %path.display(), "config missing, using defaults");
                        }
                    }
                    Err(err) => {
                        debug!(error = %err, "config unavailable");
                    }
                }
            }

            let seed = app_config.seed.into_iter().map(|user| UserNew {
                name: user.name,
                email: user.email,
            });
            let mut directory = Directory::seeded(seed).with_context(|| "seed directory")?;
            debug!(records = directory.len(), "directory seeded");

            let mut ctx = Context {
                directory: &mut directory,
                json,
            };

            match command {
                Command::Add(args) => users::add_user(&mut ctx, args),
                Command::Show(args) => users::show_user(&ctx, args),
                Command::Search(args) => users::search_users(&ctx, args),
                Command::List => users::list_users(&ctx),
                Command::Completions { .. } => {
                    unreachable!("completions command handled before directory setup")
                }
            }
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .try_init();
}
