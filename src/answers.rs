//! The answer model: what the user chose, validated once and then read-only.
//!
//! Answers come from the interactive questionnaire or from a JSON answers
//! file (`--answers`). Kind-specific choices live in [`ProjectAnswers`], so a
//! server project cannot carry a UI library, a CSS framework, or any other
//! frontend-only field.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{HeadstartError, Result};
use crate::types::{
    ClientFramework, CssFramework, Deployment, FetchLibrary, PackageManager, ProjectKind,
    ServerFramework, StateManagement, UiLibrary,
};

/// A complete, immutable set of answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answers {
    /// Name of the project directory created under the base directory
    pub app_name: String,
    #[serde(default)]
    pub package_manager: PackageManager,
    pub project: ProjectAnswers,
}

/// Kind-specific answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ProjectAnswers {
    Client(ClientAnswers),
    Server(ServerAnswers),
}

/// Frontend choices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientAnswers {
    pub framework: ClientFramework,
    pub css_framework: CssFramework,
    /// React only
    #[serde(default)]
    pub ui_library: Option<UiLibrary>,
    /// React only
    #[serde(default)]
    pub state_management: Option<StateManagement>,
    pub fetch_library: FetchLibrary,
    /// React only
    #[serde(default)]
    pub install_router: bool,
    #[serde(default)]
    pub deployment: Deployment,
}

/// Backend choices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerAnswers {
    pub framework: ServerFramework,
    #[serde(default)]
    pub deployment: Deployment,
}

impl Answers {
    /// Answers for a frontend project
    pub fn client(app_name: impl Into<String>, client: ClientAnswers) -> Self {
        Self {
            app_name: app_name.into(),
            package_manager: PackageManager::default(),
            project: ProjectAnswers::Client(client),
        }
    }

    /// Answers for a backend project
    pub fn server(app_name: impl Into<String>, server: ServerAnswers) -> Self {
        Self {
            app_name: app_name.into(),
            package_manager: PackageManager::default(),
            project: ProjectAnswers::Server(server),
        }
    }

    /// Replace the package manager (builder style)
    pub fn with_package_manager(mut self, package_manager: PackageManager) -> Self {
        self.package_manager = package_manager;
        self
    }

    pub fn kind(&self) -> ProjectKind {
        match self.project {
            ProjectAnswers::Client(_) => ProjectKind::Client,
            ProjectAnswers::Server(_) => ProjectKind::Server,
        }
    }

    /// Client answers, if this is a frontend project
    pub fn as_client(&self) -> Option<&ClientAnswers> {
        match &self.project {
            ProjectAnswers::Client(client) => Some(client),
            ProjectAnswers::Server(_) => None,
        }
    }

    /// Server answers, if this is a backend project
    pub fn as_server(&self) -> Option<&ServerAnswers> {
        match &self.project {
            ProjectAnswers::Server(server) => Some(server),
            ProjectAnswers::Client(_) => None,
        }
    }

    /// True iff the chosen CSS framework is Tailwind
    pub fn uses_tailwind(&self) -> bool {
        self.as_client()
            .is_some_and(|c| c.css_framework == CssFramework::Tailwind)
    }

    pub fn ui_library(&self) -> Option<UiLibrary> {
        self.as_client().and_then(|c| c.ui_library)
    }

    pub fn deployment(&self) -> Deployment {
        match &self.project {
            ProjectAnswers::Client(client) => client.deployment,
            ProjectAnswers::Server(server) => server.deployment,
        }
    }

    /// Human-readable framework label
    pub fn framework_label(&self) -> String {
        match &self.project {
            ProjectAnswers::Client(client) => client.framework.to_string(),
            ProjectAnswers::Server(server) => server.framework.to_string(),
        }
    }

    /// Names of the features these answers opt into, in catalog order.
    ///
    /// The plan builder checks each name against the catalog, so a choice
    /// the catalog cannot provision is caught before anything runs.
    pub fn selected_features(&self) -> Vec<String> {
        match &self.project {
            ProjectAnswers::Client(client) => {
                let mut names = vec![client.css_framework.to_string()];
                names.extend(client.ui_library.map(|ui| ui.to_string()));
                names.extend(client.state_management.map(|s| s.to_string()));
                names.push(client.fetch_library.to_string());
                if client.install_router {
                    names.push("React Router DOM".to_string());
                }
                names
            }
            ProjectAnswers::Server(server) => vec![server.framework.to_string()],
        }
    }

    /// Check the answers for internal consistency.
    ///
    /// Does not touch the filesystem; the target-directory collision check
    /// happens when the plan is built.
    pub fn validate(&self) -> Result<()> {
        validate_app_name(&self.app_name)?;

        if let ProjectAnswers::Client(client) = &self.project {
            if !client.framework.is_react() {
                if let Some(ui) = client.ui_library {
                    return Err(HeadstartError::validation(format!(
                        "{} is a React library and cannot be used with {}",
                        ui, client.framework
                    )));
                }
                if let Some(state) = client.state_management {
                    return Err(HeadstartError::validation(format!(
                        "{} is a React library and cannot be used with {}",
                        state, client.framework
                    )));
                }
                if client.install_router {
                    return Err(HeadstartError::validation(format!(
                        "React Router DOM cannot be used with {}",
                        client.framework
                    )));
                }
            }
        }

        Ok(())
    }

    /// Save answers to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize answers to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write answers to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load answers from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read answers from {:?}", path.as_ref()))?;

        let answers: Self =
            serde_json::from_str(&content).context("Failed to parse answers JSON")?;

        Ok(answers)
    }
}

/// Validate a project directory name.
///
/// Only rejects names that would escape or alias the base directory. npm and
/// PyPI naming rules are left to the generator, whose failure surfaces as a
/// failed scaffold step.
pub fn validate_app_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(HeadstartError::validation("App name must not be empty"));
    }
    if name == "." || name == ".." {
        return Err(HeadstartError::validation(format!(
            "App name '{}' refers to an existing directory",
            name
        )));
    }
    if name.contains(['/', '\\', std::path::MAIN_SEPARATOR, '\0']) {
        return Err(HeadstartError::validation(format!(
            "App name '{}' must not contain path separators",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn react_answers() -> Answers {
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

    #[test]
    fn test_valid_answers() {
        assert!(react_answers().validate().is_ok());
        assert!(react_answers().uses_tailwind());
        assert_eq!(react_answers().ui_library(), Some(UiLibrary::DaisyUi));
        assert_eq!(react_answers().kind(), ProjectKind::Client);
    }

    #[test]
    fn test_selected_features_in_catalog_order() {
        assert_eq!(
            react_answers().selected_features(),
            ["Tailwind CSS", "Daisy UI", "Zustand", "Fetch API"]
        );
    }

    #[test]
    fn test_app_name_rules() {
        assert!(validate_app_name("my-app").is_ok());
        assert!(validate_app_name("").is_err());
        assert!(validate_app_name("   ").is_err());
        assert!(validate_app_name("..").is_err());
        assert!(validate_app_name(".").is_err());
        assert!(validate_app_name("a/b").is_err());
        assert!(validate_app_name("a\\b").is_err());
    }

    #[test]
    fn test_svelte_rejects_react_only_choices() {
        let mut answers = react_answers();
        if let ProjectAnswers::Client(client) = &mut answers.project {
            client.framework = ClientFramework::Svelte;
        }
        let err = answers.validate().expect_err("daisy ui on svelte");
        assert!(err.to_string().contains("Daisy UI"));
    }

    #[test]
    fn test_server_answers_have_no_frontend_fields() {
        let answers = Answers::server(
            "api",
            ServerAnswers {
                framework: ServerFramework::FastApi,
                deployment: Deployment::Vercel,
            },
        );
        assert!(answers.validate().is_ok());
        assert!(!answers.uses_tailwind());
        assert_eq!(answers.ui_library(), None);
        assert_eq!(answers.deployment(), Deployment::Vercel);
        assert_eq!(answers.framework_label(), "FastAPI (Python)");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let answers = react_answers().with_package_manager(PackageManager::Pnpm);
        let temp_file = NamedTempFile::new().unwrap();

        answers.save_to_file(temp_file.path()).unwrap();
        let loaded = Answers::load_from_file(temp_file.path()).unwrap();

        assert_eq!(loaded, answers);
    }

    #[test]
    fn test_load_hand_written_json() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(
                br#"{
                    "app_name": "demo",
                    "project": {
                        "kind": "client",
                        "framework": "vite-react-js",
                        "css_framework": "tailwind",
                        "ui_library": "daisy-ui",
                        "state_management": "zustand",
                        "fetch_library": "fetch-api"
                    }
                }"#,
            )
            .unwrap();
        temp_file.flush().unwrap();

        let loaded = Answers::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded, react_answers());
    }

    #[test]
    fn test_load_invalid_json() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"{ invalid json }").unwrap();
        temp_file.flush().unwrap();

        assert!(Answers::load_from_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_load_nonexistent_file() {
        assert!(Answers::load_from_file("/nonexistent/answers.json").is_err());
    }
}
