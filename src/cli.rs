use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::types::PackageManager;

/// headstart - scaffold a ready-to-code project from a few questions
#[derive(Parser, Debug)]
#[command(name = "headstart")]
#[command(about = "Interactive project scaffolder for frontend and backend stacks")]
#[command(version)]
pub struct Cli {
    /// Show every step and report it as done without running commands or
    /// touching files.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Directory the project is created in (default: current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Debug logging on stderr (RUST_LOG still wins when set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new project (interactive unless --answers is given)
    New {
        /// Answers file to use instead of asking questions
        #[arg(short, long)]
        answers: Option<PathBuf>,

        /// Write the collected answers to this file before running
        #[arg(long)]
        save_answers: Option<PathBuf>,

        /// Override the package manager from the answers
        #[arg(long)]
        package_manager: Option<PackageManager>,

        /// Skip the check for required tools on PATH
        #[arg(long)]
        skip_preflight: bool,
    },
    /// Print the plan for an answers file without running it
    Plan {
        /// Answers file to plan
        #[arg(short, long)]
        answers: PathBuf,
    },
    /// Validate an answers file
    Validate {
        /// Answers file to validate
        answers: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_is_interactive_new() {
        let cli = Cli::try_parse_from(["headstart"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_new_with_answers() {
        let cli = Cli::try_parse_from([
            "headstart",
            "new",
            "--answers",
            "answers.json",
            "--package-manager",
            "pnpm",
            "--dry-run",
            "--dir",
            "/tmp/work",
        ])
        .unwrap();

        assert!(cli.dry_run);
        assert_eq!(cli.dir, Some(PathBuf::from("/tmp/work")));
        match cli.command {
            Some(Commands::New {
                answers,
                package_manager,
                skip_preflight,
                ..
            }) => {
                assert_eq!(answers, Some(PathBuf::from("answers.json")));
                assert_eq!(package_manager, Some(PackageManager::Pnpm));
                assert!(!skip_preflight);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_validate_takes_positional_path() {
        let cli = Cli::try_parse_from(["headstart", "validate", "a.json"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Validate { ref answers }) if answers == &PathBuf::from("a.json")
        ));
    }

    #[test]
    fn test_unknown_package_manager_rejected() {
        assert!(Cli::try_parse_from(["headstart", "new", "--package-manager", "bun"]).is_err());
    }
}
