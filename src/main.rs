//! headstart - main entry point

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use headstart::cli::{Cli, Commands};
use headstart::{
    build_plan, preflight, process_guard, run_questionnaire, ActionCatalog, Answers, Executor,
    PackageManager, Plan, ProcessGuard, ShellRunner, TerminalPrompter, TerminalReporter,
};

/// Logs go to stderr so they never interleave with the reporter on stdout.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);
    info!("headstart starting up");

    if let Err(e) = process_guard::init_signal_handlers() {
        // ProcessGuard still cleans up on normal exit
        warn!("Failed to install signal handlers: {}", e);
    }
    let _guard = ProcessGuard::new();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("✖ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let base_dir = match cli.dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    match cli.command {
        Some(Commands::Validate { answers }) => validate_answers(&answers),
        Some(Commands::Plan { answers }) => {
            let answers = load_answers(&answers)?;
            let plan = plan_for(&answers, &base_dir)?;
            println!("{}", plan.summary());
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::New {
            answers,
            save_answers,
            package_manager,
            skip_preflight,
        }) => create_project(NewOptions {
            answers_file: answers,
            save_answers,
            package_manager,
            skip_preflight,
            dry_run: cli.dry_run,
            base_dir,
        }),
        None => create_project(NewOptions {
            answers_file: None,
            save_answers: None,
            package_manager: None,
            skip_preflight: false,
            dry_run: cli.dry_run,
            base_dir,
        }),
    }
}

struct NewOptions {
    answers_file: Option<PathBuf>,
    save_answers: Option<PathBuf>,
    package_manager: Option<PackageManager>,
    skip_preflight: bool,
    dry_run: bool,
    base_dir: PathBuf,
}

fn load_answers(path: &Path) -> Result<Answers> {
    info!("Loading answers from {:?}", path);
    let answers = Answers::load_from_file(path)?;
    answers.validate()?;
    Ok(answers)
}

fn validate_answers(path: &Path) -> Result<ExitCode> {
    match load_answers(path) {
        Ok(answers) => {
            println!(
                "✓ Answers file is valid: {} ({})",
                answers.app_name,
                answers.framework_label()
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("✗ Answers validation failed: {:#}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn plan_for(answers: &Answers, base_dir: &Path) -> Result<Plan> {
    let catalog = ActionCatalog::for_answers(answers)?;
    let plan = build_plan(answers, &catalog, base_dir)?;
    debug!("{}", plan.summary());
    Ok(plan)
}

fn create_project(options: NewOptions) -> Result<ExitCode> {
    let mut answers = match &options.answers_file {
        Some(path) => load_answers(path)?,
        None => run_questionnaire(&mut TerminalPrompter::new())?,
    };
    if let Some(pm) = options.package_manager {
        answers = answers.with_package_manager(pm);
    }

    if let Some(path) = &options.save_answers {
        answers.save_to_file(path)?;
        println!("✓ Answers saved to {}", path.display());
    }

    let plan = plan_for(&answers, &options.base_dir)?;

    if options.dry_run {
        println!("{}", plan.summary());
    } else if options.skip_preflight || preflight::should_skip_preflight() {
        warn!("Skipping preflight checks");
    } else {
        preflight::ensure_ready(&answers)?;
    }

    let mut reporter = TerminalReporter::stdout();
    let mut executor = Executor::new(ShellRunner::new()).dry_run(options.dry_run);
    let report = executor.execute(&plan, &mut reporter);

    match report.into_result() {
        Ok(report) => {
            info!(steps = report.completed, "Project created");
            reporter.finish(plan.deployment);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("✖ Setup stopped. {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
