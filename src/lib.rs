//! headstart library
//!
//! Turns stack choices into an ordered provisioning plan and runs it with
//! progress reporting. The binary in `main.rs` is a thin shell around this.

pub mod answers;
pub mod cli;
pub mod command_runner;
pub mod engine;
pub mod error;
pub mod executor;
pub mod mutation;
pub mod preflight;
pub mod process_guard;
pub mod prompt;
pub mod questionnaire;
pub mod reporter;
pub mod types;

pub use answers::{validate_app_name, Answers, ClientAnswers, ProjectAnswers, ServerAnswers};
pub use command_runner::{CommandOutput, CommandRunner, ShellRunner};
pub use engine::{build_plan, Action, ActionCatalog, Feature, Phase, Plan, PlanStep, WorkDir};
pub use error::{HeadstartError, Result};
pub use executor::{ExecutionReport, Executor, RunStatus, StepOutcome, StepRecord};
pub use mutation::FileMutation;
pub use process_guard::{ChildRegistry, CommandProcessGroup, ProcessGuard};
pub use prompt::{Prompter, TerminalPrompter};
pub use questionnaire::run_questionnaire;
pub use reporter::{ProgressEvent, ProgressSink, RecordingSink, TerminalReporter};
pub use types::{
    ClientFramework, CssFramework, Deployment, FetchLibrary, PackageManager, ProjectKind,
    ServerFramework, StateManagement, UiLibrary,
};
