pub mod commands;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::exit;

use crate::application::services::{LogFormat, StatusFormat};
use crate::infrastructure::filesystem::config_store::CONFIG_ENV;
use crate::presentation::ui::DisplayHelper;
use commands::{AddCommand, CloneCommand, CommandContext, LogCommand, StatusCommand};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    " ",
    env!("BUILD_DATE"),
    ")"
);

/// bmo - Treat a set of git repositories as one workspace
#[derive(Parser, Debug)]
#[command(name = "bmo")]
#[command(about = "Treat a set of git repositories as one workspace")]
#[command(version, long_version = LONG_VERSION)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Working directory (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Workspace registry file (defaults to ~/.bmoconfig)
    #[arg(long, global = true, env = CONFIG_ENV)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clone a repository and add it to a workspace
    Clone {
        /// Workspace to add the repository to (created if missing)
        workspace: String,

        /// URL or local path of the repository
        url: String,

        /// Destination directory (defaults to the repository name)
        path: Option<PathBuf>,
    },

    /// Show commit logs for every repository in a workspace
    Log {
        /// Show one line per commit
        #[arg(long, conflicts_with = "json")]
        oneline: bool,

        /// Maximum number of commits to show per repository
        #[arg(short = 'n', long)]
        max_count: Option<usize>,

        /// Maximum number of repositories read at once
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Print one JSON object per commit
        #[arg(long)]
        json: bool,

        /// Workspace to read
        workspace: String,
    },

    /// Show the working tree status of every repository in a workspace
    Status {
        /// Give the output in the short format
        #[arg(short, long, conflicts_with = "json")]
        short: bool,

        /// Maximum number of repositories read at once
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Print one JSON object per repository
        #[arg(long)]
        json: bool,

        /// Workspace to read
        workspace: String,
    },

    /// Stage files given as <repo>/<file>
    Add {
        /// Workspace the repositories belong to
        workspace: String,

        /// Files to stage, as <repo>/<file> (comma-separated lists are accepted)
        #[arg(required = true)]
        files: Vec<String>,
    },
}

/// Long flags that may also be spelled with a single dash (`-oneline`, `-jobs=4`)
const SINGLE_DASH_FLAGS: &[&str] = &[
    "oneline",
    "short",
    "json",
    "jobs",
    "max-count",
    "verbose",
    "no-color",
    "directory",
    "config",
];

/// Rewrite `-name` / `-name=value` spellings of long flags to `--name`
///
/// Short flags and clusters (`-s`, `-vn5`) are left alone, as is everything after `--`.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if passthrough {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                passthrough = true;
                return arg;
            }
            match text.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') => {
                    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
                    if SINGLE_DASH_FLAGS.contains(&name) {
                        OsString::from(format!("-{}", text))
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}

fn error_prefix(use_color: bool) -> String {
    if use_color && console::user_attended_stderr() {
        "bmo".red().bold().to_string()
    } else {
        "bmo".to_string()
    }
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

impl CliApp {
    pub fn new() -> Self {
        Self::from_args(env::args_os())
    }

    /// Parse the given command line, exiting on usage errors
    ///
    /// Help and version requests exit with 0; every other parse failure
    /// is reported as `bmo: <error>` with exit code 1.
    pub fn from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        match Cli::try_parse_from(normalize_args(args)) {
            Ok(cli) => Self { cli },
            Err(e) => match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
                ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                    eprint!("{}", e);
                    eprintln!("{}: no command given", error_prefix(true));
                    exit(1);
                }
                _ => {
                    let message = e.to_string();
                    let message = message.trim_end();
                    let message = message.strip_prefix("error: ").unwrap_or(message);
                    eprintln!("{}: {}", error_prefix(true), message);
                    exit(1);
                }
            },
        }
    }

    pub fn verbose(&self) -> bool {
        self.cli.verbose
    }

    pub async fn run(self) -> anyhow::Result<()> {
        if self.cli.no_color {
            colored::control::set_override(false);
        }

        match self.handle_command().await {
            Ok(_) => Ok(()),
            Err(e) => {
                eprintln!("{}: {}", error_prefix(!self.cli.no_color), e);
                exit(1);
            }
        }
    }

    async fn handle_command(&self) -> anyhow::Result<()> {
        // Change directory if specified
        if let Some(ref dir) = self.cli.directory {
            env::set_current_dir(dir)?;
        }

        let context = CommandContext::new(
            self.cli.config.clone(),
            env::current_dir()?,
            DisplayHelper::new(!self.cli.no_color),
        );

        match &self.cli.command {
            Commands::Clone {
                workspace,
                url,
                path,
            } => CloneCommand::new(workspace.clone(), url.clone(), path.clone()).execute(&context),
            Commands::Log {
                oneline,
                max_count,
                jobs,
                json,
                workspace,
            } => {
                let format = if *json {
                    LogFormat::Json
                } else if *oneline {
                    LogFormat::Oneline
                } else {
                    LogFormat::Full
                };
                LogCommand::new(workspace.clone(), format, *max_count, *jobs)
                    .execute(&context)
                    .await
            }
            Commands::Status {
                short,
                jobs,
                json,
                workspace,
            } => {
                let format = if *json {
                    StatusFormat::Json
                } else if *short {
                    StatusFormat::Short
                } else {
                    StatusFormat::Full
                };
                StatusCommand::new(workspace.clone(), format, *jobs)
                    .execute(&context)
                    .await
            }
            Commands::Add { workspace, files } => {
                AddCommand::new(workspace.clone(), files.clone()).execute(&context)
            }
        }
    }
}
