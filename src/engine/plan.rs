//! Plan Builder
//!
//! Translates validated [`Answers`] into an ordered [`Plan`] of steps the
//! executor can run.
//!
//! # Ordering
//!
//! | Position | Steps |
//! |----------|-------|
//! | first    | framework scaffold (phase 0, runs in the base directory) |
//! | then     | selected features, stable-sorted by phase |
//!
//! A feature's actions inherit its phase, so they stay contiguous and in
//! declared order. Ties between features keep catalog order.
//!
//! # Design
//!
//! - **Pure logic**: the only I/O is one existence check on the target dir
//! - **Explicit directories**: each step names where it runs; the process
//!   working directory is never changed

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::answers::Answers;
use crate::error::{HeadstartError, Result};
use crate::types::{Deployment, ProjectKind};

use super::catalog::{Action, ActionCatalog, Phase, SCAFFOLD_FEATURE};

// ============================================================================
// Plan Types
// ============================================================================

/// Directory a step runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkDir {
    /// The directory the project is created under
    Base,
    /// `<base>/<app_name>`, created by the scaffold step
    Project,
}

/// One step of the plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanStep {
    /// Catalog feature this step belongs to
    pub feature: String,
    pub phase: Phase,
    pub action: Action,
    pub workdir: WorkDir,
}

impl PlanStep {
    pub fn label(&self) -> String {
        self.action.label()
    }
}

impl fmt::Display for PlanStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.phase, self.feature, self.action)
    }
}

/// An immutable, ordered list of steps plus the context they run in
#[derive(Debug, Clone)]
pub struct Plan {
    pub app_name: String,
    pub kind: ProjectKind,
    pub base_dir: PathBuf,
    pub deployment: Deployment,
    steps: Vec<PlanStep>,
}

impl Plan {
    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// `<base>/<app_name>`
    pub fn project_dir(&self) -> PathBuf {
        self.base_dir.join(&self.app_name)
    }

    /// Resolve a step's directory
    pub fn dir_for(&self, workdir: WorkDir) -> PathBuf {
        match workdir {
            WorkDir::Base => self.base_dir.clone(),
            WorkDir::Project => self.project_dir(),
        }
    }

    /// Features in execution order, without repeats
    pub fn features(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for step in &self.steps {
            if names.last() != Some(&step.feature.as_str()) {
                names.push(&step.feature);
            }
        }
        names
    }

    /// Returns true if any step writes or edits `path` (project-relative).
    pub fn mutates(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        self.steps
            .iter()
            .filter_map(|s| s.action.as_mutation())
            .any(|m| m.path() == path)
    }

    /// Returns a summary of the plan for display.
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("Project Plan: {} ({})", self.app_name, self.kind),
            format!("  Location: {}", self.project_dir().display()),
            format!("  Deployment: {}", self.deployment),
            format!("  Steps ({}):", self.steps.len()),
        ];
        for (i, step) in self.steps.iter().enumerate() {
            lines.push(format!("    {}. {}", i + 1, step));
        }
        lines.join("\n")
    }
}

// ============================================================================
// Plan Calculation
// ============================================================================

/// Build the execution plan for `answers` using `catalog`.
///
/// # Errors
///
/// - `Validation`: bad app name, React-only choices on Svelte, or
///   `<base_dir>/<app_name>` already exists
/// - `Catalog`: the catalog is for the other project kind, or an answer has
///   no matching feature
///
/// # What This Explicitly Refuses To Do
///
/// - Check npm/PyPI naming rules: the generator reports those
/// - Run anything
pub fn build_plan(answers: &Answers, catalog: &ActionCatalog, base_dir: &Path) -> Result<Plan> {
    answers.validate()?;

    let target = base_dir.join(&answers.app_name);
    if target.exists() {
        return Err(HeadstartError::validation(format!(
            "Directory {} already exists",
            target.display()
        )));
    }

    if catalog.kind() != answers.kind() {
        return Err(HeadstartError::catalog(format!(
            "{} answers cannot be planned with the {} catalog",
            answers.kind(),
            catalog.kind()
        )));
    }

    for name in answers.selected_features() {
        let known = catalog
            .get(&name)
            .is_some_and(|feature| (feature.is_selected)(answers));
        if !known {
            return Err(HeadstartError::catalog(format!(
                "No catalog entry provides '{}'",
                name
            )));
        }
    }

    let mut feature_steps: Vec<PlanStep> = Vec::new();
    for feature in catalog.features() {
        if !(feature.is_selected)(answers) {
            continue;
        }
        debug!(feature = feature.name, phase = %feature.phase, "Feature selected");
        for action in (feature.provision)(answers) {
            feature_steps.push(PlanStep {
                feature: feature.name.to_string(),
                phase: feature.phase,
                action,
                workdir: WorkDir::Project,
            });
        }
    }
    // sort_by_key is stable
    feature_steps.sort_by_key(|step| step.phase);

    let mut steps = Vec::with_capacity(feature_steps.len() + 1);
    steps.push(PlanStep {
        feature: SCAFFOLD_FEATURE.to_string(),
        phase: Phase::Scaffold,
        action: catalog.scaffold(answers)?,
        workdir: WorkDir::Base,
    });
    steps.extend(feature_steps);

    debug!(steps = steps.len(), app = %answers.app_name, "Plan built");

    Ok(Plan {
        app_name: answers.app_name.clone(),
        kind: answers.kind(),
        base_dir: base_dir.to_path_buf(),
        deployment: answers.deployment(),
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::{ClientAnswers, ServerAnswers};
    use crate::engine::catalog::Feature;
    use crate::mutation::FileMutation;
    use crate::types::*;
    use tempfile::TempDir;

    fn scenario_a() -> Answers {
        Answers::client(
            "demo",
            ClientAnswers {
                framework: ClientFramework::ViteReactJs,
                css_framework: CssFramework::Tailwind,
                ui_library: Some(UiLibrary::DaisyUi),
                state_management: Some(StateManagement::Zustand),
                fetch_library: FetchLibrary::FetchApi,
                install_router: false,
                deployment: Deployment::None,
            },
        )
    }

    fn plan_for(answers: &Answers) -> Plan {
        let dir = TempDir::new().unwrap();
        let catalog = ActionCatalog::for_answers(answers).unwrap();
        build_plan(answers, &catalog, dir.path()).unwrap()
    }

    #[test]
    fn test_scenario_a_order() {
        let plan = plan_for(&scenario_a());
        assert_eq!(plan.len(), 7);

        let features: Vec<&str> = plan.steps().iter().map(|s| s.feature.as_str()).collect();
        assert_eq!(
            features,
            [
                "Project template",
                "Tailwind CSS",
                "Tailwind CSS",
                "Tailwind CSS",
                "Daisy UI",
                "Zustand",
                "Fetch API",
            ]
        );

        assert!(matches!(
            &plan.steps()[0].action,
            Action::Command { line, .. } if line == "npx create-vite@latest demo --template react"
        ));
        assert_eq!(plan.steps()[0].workdir, WorkDir::Base);
        assert!(plan.steps()[1..].iter().all(|s| s.workdir == WorkDir::Project));

        assert!(matches!(
            &plan.steps()[2].action,
            Action::FileMutation(FileMutation::Write { contents, .. }) if contents.contains("daisyui")
        ));
        assert!(matches!(
            &plan.steps()[3].action,
            Action::FileMutation(FileMutation::Prepend { .. })
        ));
        assert!(matches!(
            &plan.steps()[6].action,
            Action::Command { line, .. } if line.starts_with("echo")
        ));
    }

    #[test]
    fn test_minimal_client_plan() {
        let answers = Answers::client(
            "demo",
            ClientAnswers {
                framework: ClientFramework::Svelte,
                css_framework: CssFramework::Bootstrap,
                ui_library: None,
                state_management: None,
                fetch_library: FetchLibrary::FetchApi,
                install_router: false,
                deployment: Deployment::Netlify,
            },
        );
        let plan = plan_for(&answers);
        assert_eq!(plan.features(), ["Project template", "Bootstrap", "Fetch API"]);
        assert!(!plan.mutates("tailwind.config.js"));
        assert_eq!(plan.deployment, Deployment::Netlify);
    }

    #[test]
    fn test_server_plan_is_scaffold_plus_install() {
        let answers = Answers::server(
            "api",
            ServerAnswers {
                framework: ServerFramework::FastApi,
                deployment: Deployment::None,
            },
        );
        let plan = plan_for(&answers);

        assert!(!plan.is_empty());
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.steps()[0].phase, Phase::Scaffold);
        assert_eq!(plan.steps()[1].phase, Phase::Install);
        assert!(matches!(
            &plan.steps()[1].action,
            Action::Command { line, .. } if line == ".venv/bin/pip install fastapi uvicorn"
        ));
    }

    #[test]
    fn test_existing_directory_rejected() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("demo")).unwrap();

        let answers = scenario_a();
        let catalog = ActionCatalog::client().unwrap();
        let err = build_plan(&answers, &catalog, dir.path()).unwrap_err();
        assert!(matches!(err, HeadstartError::Validation(_)));
    }

    #[test]
    fn test_invalid_name_rejected() {
        let dir = TempDir::new().unwrap();
        let mut answers = scenario_a();
        answers.app_name = "../escape".to_string();

        let catalog = ActionCatalog::client().unwrap();
        let err = build_plan(&answers, &catalog, dir.path()).unwrap_err();
        assert!(matches!(err, HeadstartError::Validation(_)));
    }

    #[test]
    fn test_wrong_catalog_kind() {
        let dir = TempDir::new().unwrap();
        let catalog = ActionCatalog::server().unwrap();
        let err = build_plan(&scenario_a(), &catalog, dir.path()).unwrap_err();
        assert!(matches!(err, HeadstartError::Catalog(_)));
    }

    #[test]
    fn test_missing_catalog_entry() {
        let dir = TempDir::new().unwrap();
        let mut catalog = ActionCatalog::empty(ProjectKind::Client);
        catalog
            .register(Feature::new("Tailwind CSS", Phase::Install, |_| true, |_| vec![]))
            .unwrap();

        let err = build_plan(&scenario_a(), &catalog, dir.path()).unwrap_err();
        assert!(err.to_string().contains("Daisy UI"));
    }

    #[test]
    fn test_configure_phase_sorts_after_installs() {
        let dir = TempDir::new().unwrap();
        let mut catalog = ActionCatalog::empty(ProjectKind::Server);
        catalog
            .register(Feature::new("Late", Phase::Configure, |_| true, |_| {
                vec![Action::command("true", "late")]
            }))
            .unwrap();
        catalog
            .register(Feature::new("Flask (Python)", Phase::Install, |_| true, |_| {
                vec![Action::command("true", "a"), Action::command("true", "b")]
            }))
            .unwrap();

        let answers = Answers::server(
            "api",
            ServerAnswers {
                framework: ServerFramework::Flask,
                deployment: Deployment::None,
            },
        );
        let plan = build_plan(&answers, &catalog, dir.path()).unwrap();
        let labels: Vec<String> = plan.steps().iter().map(|s| s.label()).collect();
        assert_eq!(
            labels,
            ["Setting up the project template", "a", "b", "late"]
        );
    }

    #[test]
    fn test_summary_lists_steps() {
        let plan = plan_for(&scenario_a());
        let summary = plan.summary();
        assert!(summary.contains("Project Plan: demo"));
        assert!(summary.contains("Steps (7):"));
        assert!(summary.contains("    7. [install] Fetch API"));
    }
}
