//! Type-safe stack choices
//!
//! Every question the scaffolder asks has a closed set of answers. Each one
//! is an enum here: `Display`/`FromStr` (strum) use the label shown to the
//! user, serde uses a stable kebab-case key for answers files.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Kind of project being scaffolded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectKind {
    #[default]
    #[strum(serialize = "Client (frontend)")]
    Client,
    #[strum(serialize = "Server (backend)")]
    Server,
}

/// Frontend framework and the template used to generate it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "kebab-case")]
pub enum ClientFramework {
    #[strum(serialize = "React (CRA)")]
    ReactCra,
    #[strum(serialize = "React with Vite (TypeScript)")]
    ViteReactTs,
    #[default]
    #[strum(serialize = "React with Vite (JavaScript)")]
    ViteReactJs,
    #[strum(serialize = "Svelte")]
    Svelte,
}

impl ClientFramework {
    /// React-based frameworks accept UI library, state and router choices.
    pub fn is_react(&self) -> bool {
        !matches!(self, Self::Svelte)
    }

    /// The `create-vite` template name, or `None` for create-react-app.
    pub fn vite_template(&self) -> Option<&'static str> {
        match self {
            Self::ReactCra => None,
            Self::ViteReactTs => Some("react-ts"),
            Self::ViteReactJs => Some("react"),
            Self::Svelte => Some("svelte"),
        }
    }
}

/// Backend framework
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "kebab-case")]
pub enum ServerFramework {
    #[default]
    #[strum(serialize = "Express (Node.js)")]
    Express,
    #[strum(serialize = "FastAPI (Python)")]
    FastApi,
    #[strum(serialize = "Flask (Python)")]
    Flask,
}

impl ServerFramework {
    /// Python frameworks are provisioned into a `.venv` with pip.
    pub fn is_python(&self) -> bool {
        matches!(self, Self::FastApi | Self::Flask)
    }
}

/// CSS framework or preprocessor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "kebab-case")]
pub enum CssFramework {
    #[default]
    #[strum(serialize = "Tailwind CSS")]
    Tailwind,
    #[strum(serialize = "Bootstrap")]
    Bootstrap,
    #[strum(serialize = "Sass")]
    Sass,
}

/// Component library (React only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "kebab-case")]
pub enum UiLibrary {
    #[strum(serialize = "Material UI")]
    MaterialUi,
    #[strum(serialize = "Chakra UI")]
    ChakraUi,
    #[strum(serialize = "Daisy UI")]
    DaisyUi,
    #[strum(serialize = "Ant Design")]
    AntDesign,
}

/// State management tool (React only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "kebab-case")]
pub enum StateManagement {
    #[strum(serialize = "Redux")]
    Redux,
    #[strum(serialize = "Zustand")]
    Zustand,
    #[strum(serialize = "MobX")]
    Mobx,
}

/// HTTP fetching library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "kebab-case")]
pub enum FetchLibrary {
    #[strum(serialize = "Axios")]
    Axios,
    #[default]
    #[strum(serialize = "Fetch API")]
    FetchApi,
}

/// Deployment platform. Only used for the closing reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "kebab-case")]
pub enum Deployment {
    #[strum(serialize = "Vercel")]
    Vercel,
    #[strum(serialize = "Netlify")]
    Netlify,
    #[default]
    #[strum(serialize = "None")]
    None,
}

/// Node package manager used for installs and one-shot generators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Pnpm,
    Yarn,
}

impl PackageManager {
    /// Binary name looked up on PATH.
    pub fn binary(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Pnpm => "pnpm",
            Self::Yarn => "yarn",
        }
    }

    /// Command prefix that adds packages to the current project.
    pub fn add_command(&self, dev: bool) -> &'static str {
        match (self, dev) {
            (Self::Npm, false) => "npm install",
            (Self::Npm, true) => "npm install -D",
            (Self::Pnpm, false) => "pnpm add",
            (Self::Pnpm, true) => "pnpm add -D",
            (Self::Yarn, false) => "yarn add",
            (Self::Yarn, true) => "yarn add -D",
        }
    }

    /// Command that installs whatever the manifest already lists.
    pub fn install_all_command(&self) -> &'static str {
        match self {
            Self::Npm => "npm install",
            Self::Pnpm => "pnpm install",
            Self::Yarn => "yarn install",
        }
    }

    /// One-shot package runner (`npx` and friends).
    pub fn runner(&self) -> &'static str {
        match self {
            Self::Npm => "npx",
            Self::Pnpm => "pnpm dlx",
            Self::Yarn => "yarn dlx",
        }
    }
}
