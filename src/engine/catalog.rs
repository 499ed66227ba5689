//! Action Catalog
//!
//! Maps each named feature to the provisioning actions it needs. Two static
//! registries exist, one per project kind:
//!
//! | Catalog | Scaffold                                   | Features |
//! |---------|--------------------------------------------|----------|
//! | client  | `create-react-app` / `create-vite`         | CSS, UI library, state, fetch, router |
//! | server  | `express-generator` / `python3 -m venv`    | framework dependencies |
//!
//! Registration order is the order the questions are asked, and it is the
//! order the plan builder walks. Package lists and file bodies come from
//! [`super::templates`].

use std::fmt;

use crate::answers::{Answers, ProjectAnswers};
use crate::error::{HeadstartError, Result};
use crate::mutation::FileMutation;
use crate::types::{
    ClientFramework, CssFramework, FetchLibrary, PackageManager, ProjectKind, ServerFramework,
    StateManagement, UiLibrary,
};

use super::templates::{self, packages};

// ============================================================================
// Phases and Actions
// ============================================================================

/// Coarse ordering class of a step.
///
/// Steps are stable-sorted by phase, so every install precedes every
/// configuration step regardless of which feature provides it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// Project generation. Only the framework scaffold lives here.
    Scaffold = 0,
    Install = 1,
    Configure = 2,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scaffold => write!(f, "scaffold"),
            Self::Install => write!(f, "install"),
            Self::Configure => write!(f, "configure"),
        }
    }
}

/// One atomic provisioning step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// External command line, run through `sh -c`
    Command { line: String, label: String },

    /// Create or modify a file under the project root
    FileMutation(FileMutation),
}

impl Action {
    pub fn command(line: impl Into<String>, label: impl Into<String>) -> Self {
        Self::Command {
            line: line.into(),
            label: label.into(),
        }
    }

    /// Progress label shown to the user
    pub fn label(&self) -> String {
        match self {
            Self::Command { label, .. } => label.clone(),
            Self::FileMutation(mutation) => mutation.label(),
        }
    }

    /// The mutation carried by this action, if any
    pub fn as_mutation(&self) -> Option<&FileMutation> {
        match self {
            Self::FileMutation(mutation) => Some(mutation),
            Self::Command { .. } => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command { line, .. } => write!(f, "$ {}", line),
            Self::FileMutation(mutation) => write!(f, "{}", mutation),
        }
    }
}

// ============================================================================
// Features
// ============================================================================

/// A named capability the user can opt into
#[derive(Clone)]
pub struct Feature {
    /// Unique within a catalog. Doubles as the progress label prefix.
    pub name: &'static str,
    pub phase: Phase,
    /// Does this feature apply to the given answers?
    pub is_selected: fn(&Answers) -> bool,
    /// Actions in the order they must run
    pub provision: fn(&Answers) -> Vec<Action>,
}

impl Feature {
    pub fn new(
        name: &'static str,
        phase: Phase,
        is_selected: fn(&Answers) -> bool,
        provision: fn(&Answers) -> Vec<Action>,
    ) -> Self {
        Self {
            name,
            phase,
            is_selected,
            provision,
        }
    }
}

impl fmt::Debug for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feature")
            .field("name", &self.name)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

/// Name under which scaffold steps are reported
pub const SCAFFOLD_FEATURE: &str = "Project template";

// ============================================================================
// Catalog
// ============================================================================

/// Ordered registry of features for one project kind
#[derive(Debug, Clone)]
pub struct ActionCatalog {
    kind: ProjectKind,
    features: Vec<Feature>,
}

impl ActionCatalog {
    /// An empty catalog for the given project kind
    pub fn empty(kind: ProjectKind) -> Self {
        Self {
            kind,
            features: Vec::new(),
        }
    }

    /// Register a feature at the end of the catalog.
    ///
    /// # Errors
    ///
    /// - the name is already registered
    /// - the feature claims the scaffold phase
    pub fn register(&mut self, feature: Feature) -> Result<()> {
        if self.get(feature.name).is_some() {
            return Err(HeadstartError::catalog(format!(
                "Feature '{}' is registered twice",
                feature.name
            )));
        }
        if feature.phase == Phase::Scaffold {
            return Err(HeadstartError::catalog(format!(
                "Feature '{}' cannot run in the scaffold phase",
                feature.name
            )));
        }
        self.features.push(feature);
        Ok(())
    }

    pub fn kind(&self) -> ProjectKind {
        self.kind
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn get(&self, name: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.name == name)
    }

    /// The catalog that matches the answers' project kind
    pub fn for_answers(answers: &Answers) -> Result<Self> {
        match answers.kind() {
            ProjectKind::Client => Self::client(),
            ProjectKind::Server => Self::server(),
        }
    }

    /// Frontend features, in question order
    pub fn client() -> Result<Self> {
        let mut catalog = Self::empty(ProjectKind::Client);

        // CSS
        catalog.register(Feature::new(
            "Tailwind CSS",
            Phase::Install,
            |a| css_is(a, CssFramework::Tailwind),
            tailwind_actions,
        ))?;
        catalog.register(Feature::new(
            "Bootstrap",
            Phase::Install,
            |a| css_is(a, CssFramework::Bootstrap),
            |a| vec![install(a, "Bootstrap", packages::BOOTSTRAP, false)],
        ))?;
        catalog.register(Feature::new(
            "Sass",
            Phase::Install,
            |a| css_is(a, CssFramework::Sass),
            |a| vec![install(a, "Sass", packages::SASS, false)],
        ))?;

        // UI library
        catalog.register(Feature::new(
            "Material UI",
            Phase::Install,
            |a| a.ui_library() == Some(UiLibrary::MaterialUi),
            |a| vec![install(a, "Material UI", packages::MATERIAL_UI, false)],
        ))?;
        catalog.register(Feature::new(
            "Chakra UI",
            Phase::Install,
            |a| a.ui_library() == Some(UiLibrary::ChakraUi),
            |a| vec![install(a, "Chakra UI", packages::CHAKRA_UI, false)],
        ))?;
        catalog.register(Feature::new(
            "Daisy UI",
            Phase::Install,
            |a| a.ui_library() == Some(UiLibrary::DaisyUi),
            |a| vec![install(a, "Daisy UI", packages::DAISY_UI, false)],
        ))?;
        catalog.register(Feature::new(
            "Ant Design",
            Phase::Install,
            |a| a.ui_library() == Some(UiLibrary::AntDesign),
            |a| vec![install(a, "Ant Design", packages::ANT_DESIGN, false)],
        ))?;

        // State management
        catalog.register(Feature::new(
            "Redux",
            Phase::Install,
            |a| state_is(a, StateManagement::Redux),
            |a| vec![install(a, "Redux", packages::REDUX, false)],
        ))?;
        catalog.register(Feature::new(
            "Zustand",
            Phase::Install,
            |a| state_is(a, StateManagement::Zustand),
            |a| vec![install(a, "Zustand", packages::ZUSTAND, false)],
        ))?;
        catalog.register(Feature::new(
            "MobX",
            Phase::Install,
            |a| state_is(a, StateManagement::Mobx),
            |a| vec![install(a, "MobX", packages::MOBX, false)],
        ))?;

        // Fetching
        catalog.register(Feature::new(
            "Axios",
            Phase::Install,
            |a| fetch_is(a, FetchLibrary::Axios),
            |a| vec![install(a, "Axios", packages::AXIOS, false)],
        ))?;
        catalog.register(Feature::new(
            "Fetch API",
            Phase::Install,
            |a| fetch_is(a, FetchLibrary::FetchApi),
            |_| {
                vec![Action::command(
                    templates::FETCH_API_NOTICE,
                    "Checking Fetch API",
                )]
            },
        ))?;

        // Routing
        catalog.register(Feature::new(
            "React Router DOM",
            Phase::Install,
            |a| a.as_client().is_some_and(|c| c.install_router),
            |a| vec![install(a, "React Router DOM", packages::REACT_ROUTER_DOM, false)],
        ))?;

        Ok(catalog)
    }

    /// Backend features: one dependency install per framework
    pub fn server() -> Result<Self> {
        let mut catalog = Self::empty(ProjectKind::Server);

        catalog.register(Feature::new(
            "Express (Node.js)",
            Phase::Install,
            |a| server_is(a, ServerFramework::Express),
            |a| {
                vec![Action::command(
                    a.package_manager.install_all_command(),
                    "Installing Express (Node.js) dependencies",
                )]
            },
        ))?;
        catalog.register(Feature::new(
            "FastAPI (Python)",
            Phase::Install,
            |a| server_is(a, ServerFramework::FastApi),
            |_| vec![pip_install("FastAPI (Python)", packages::FASTAPI)],
        ))?;
        catalog.register(Feature::new(
            "Flask (Python)",
            Phase::Install,
            |a| server_is(a, ServerFramework::Flask),
            |_| vec![pip_install("Flask (Python)", packages::FLASK)],
        ))?;

        Ok(catalog)
    }

    /// The framework scaffold command for these answers.
    ///
    /// Runs in the base directory and creates `<base>/<app_name>`. The name
    /// is shell-quoted, so it reaches the generator as a single argument.
    pub fn scaffold(&self, answers: &Answers) -> Result<Action> {
        let pm = answers.package_manager;
        let app = shell_quote(&answers.app_name)?;

        let line = match &answers.project {
            ProjectAnswers::Client(client) => match client.framework.vite_template() {
                None => format!("{} create-react-app {}", pm.runner(), app),
                Some(template) => format!(
                    "{} create-vite@latest {} --template {}",
                    pm.runner(),
                    app,
                    template
                ),
            },
            ProjectAnswers::Server(server) if server.framework.is_python() => {
                let venv = shell_quote(&format!("{}/.venv", answers.app_name))?;
                format!("python3 -m venv {}", venv)
            }
            ProjectAnswers::Server(_) => {
                format!("{} express-generator {} --no-view", pm.runner(), app)
            }
        };

        Ok(Action::command(line, "Setting up the project template"))
    }
}

// ============================================================================
// Provisioning Helpers
// ============================================================================

fn css_is(answers: &Answers, css: CssFramework) -> bool {
    answers.as_client().is_some_and(|c| c.css_framework == css)
}

fn state_is(answers: &Answers, state: StateManagement) -> bool {
    answers
        .as_client()
        .is_some_and(|c| c.state_management == Some(state))
}

fn fetch_is(answers: &Answers, fetch: FetchLibrary) -> bool {
    answers.as_client().is_some_and(|c| c.fetch_library == fetch)
}

fn server_is(answers: &Answers, framework: ServerFramework) -> bool {
    answers.as_server().is_some_and(|s| s.framework == framework)
}

fn shell_quote(word: &str) -> Result<String> {
    shlex::try_quote(word)
        .map(|quoted| quoted.into_owned())
        .map_err(|e| HeadstartError::validation(format!("Cannot use '{}' in a command: {}", word, e)))
}

fn install_line(pm: PackageManager, packages: &[&str], dev: bool) -> String {
    format!("{} {}", pm.add_command(dev), packages.join(" "))
}

fn install(answers: &Answers, name: &str, packages: &[&str], dev: bool) -> Action {
    Action::command(
        install_line(answers.package_manager, packages, dev),
        format!("Installing {}", name),
    )
}

fn pip_install(name: &str, packages: &[&str]) -> Action {
    Action::command(
        format!(".venv/bin/pip install {}", packages.join(" ")),
        format!("Installing {}", name),
    )
}

/// Install + init, config file, stylesheet directives. Contiguous and in
/// this order: the config write overwrites what `init` generated.
fn tailwind_actions(answers: &Answers) -> Vec<Action> {
    let pm = answers.package_manager;
    let framework = answers
        .as_client()
        .map(|c| c.framework)
        .unwrap_or_default();
    let daisy = answers.ui_library() == Some(UiLibrary::DaisyUi);

    let config = match (framework, daisy) {
        (ClientFramework::ReactCra, false) => templates::TAILWIND_CONFIG_CJS,
        (ClientFramework::ReactCra, true) => templates::TAILWIND_CONFIG_CJS_DAISYUI,
        (_, false) => templates::TAILWIND_CONFIG_ESM,
        (_, true) => templates::TAILWIND_CONFIG_ESM_DAISYUI,
    };
    let stylesheet = match framework {
        ClientFramework::Svelte => templates::SVELTE_STYLESHEET_PATH,
        _ => templates::REACT_STYLESHEET_PATH,
    };

    vec![
        Action::command(
            format!(
                "{} && {} {}",
                install_line(pm, packages::TAILWIND, true),
                pm.runner(),
                templates::TAILWIND_INIT
            ),
            "Installing Tailwind CSS",
        ),
        Action::FileMutation(FileMutation::write(templates::TAILWIND_CONFIG_PATH, config)),
        Action::FileMutation(FileMutation::prepend(
            stylesheet,
            templates::TAILWIND_DIRECTIVES,
        )),
    ]
}
