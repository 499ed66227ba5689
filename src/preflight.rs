//! Pre-flight tool checks
//!
//! Before anything runs, make sure the binaries the plan will call are on
//! `PATH`. A missing `npx` halfway through a run would leave a scaffolded
//! project with none of its dependencies.
//!
//! Yarn is also version-checked: Yarn 1 has no `yarn dlx`, which every
//! Yarn scaffold goes through.

use std::process::{Command, Stdio};

use tracing::{debug, info, warn};

use crate::answers::Answers;
use crate::error::{HeadstartError, Result};

/// Oldest Yarn major version that ships `yarn dlx`
const MIN_YARN_MAJOR: u32 = 2;

/// Result of tool verification
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreflightResult {
    pub missing_binaries: Vec<String>,
    /// Found, but too old to run the plan
    pub outdated: Vec<String>,
}

impl PreflightResult {
    pub fn is_ok(&self) -> bool {
        self.missing_binaries.is_empty() && self.outdated.is_empty()
    }
}

/// Binaries a run for `answers` will invoke
pub fn required_binaries(answers: &Answers) -> Vec<&'static str> {
    let mut binaries = vec!["sh"];
    let python = answers
        .as_server()
        .is_some_and(|server| server.framework.is_python());

    if python {
        binaries.push("python3");
    } else {
        binaries.push("node");
        binaries.push(answers.package_manager.binary());
    }
    binaries
}

/// Look `name` up the way the shell would
fn binary_exists(name: &str) -> bool {
    Command::new("sh")
        .args(["-c", r#"command -v "$1" >/dev/null 2>&1"#, "sh", name])
        .stdin(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// `<binary> --version`, trimmed; `None` if it cannot be run
fn tool_version(binary: &str) -> Option<String> {
    let output = Command::new(binary)
        .arg("--version")
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Leading number of a `1.22.19` / `v4.1.0` style version
fn major_version(version: &str) -> Option<u32> {
    version
        .trim()
        .trim_start_matches('v')
        .split('.')
        .next()?
        .parse()
        .ok()
}

/// `Some(reason)` when this Yarn version cannot run `yarn dlx`
fn yarn_version_problem(version: &str) -> Option<String> {
    let major = major_version(version)?;
    (major < MIN_YARN_MAJOR).then(|| {
        format!(
            "yarn {} has no `yarn dlx`; Yarn {} or later is required (upgrade: corepack enable && yarn set version stable)",
            version, MIN_YARN_MAJOR
        )
    })
}

/// Where to get a missing binary
fn install_hint(binary: &str) -> &'static str {
    match binary {
        "sh" => "a POSIX shell (usually preinstalled)",
        "node" | "npm" => "Node.js from https://nodejs.org",
        "pnpm" => "npm install -g pnpm",
        "yarn" => "npm install -g yarn",
        "python3" => "Python 3 from https://www.python.org",
        _ => "your system package manager",
    }
}

/// Check every binary `answers` needs
pub fn verify_environment(answers: &Answers) -> PreflightResult {
    let required = required_binaries(answers);
    let missing_binaries: Vec<String> = required
        .iter()
        .filter(|binary| {
            let found = binary_exists(binary);
            debug!(binary, found, "Preflight lookup");
            !found
        })
        .map(|binary| binary.to_string())
        .collect();

    let mut outdated = Vec::new();
    let yarn_needed = required.contains(&"yarn") && !missing_binaries.iter().any(|b| b == "yarn");
    if yarn_needed && let Some(version) = tool_version("yarn") {
        debug!(%version, "Yarn version");
        outdated.extend(yarn_version_problem(&version));
    }

    PreflightResult {
        missing_binaries,
        outdated,
    }
}

/// Render the failure for stderr
pub fn describe_failure(result: &PreflightResult) -> String {
    let mut lines = Vec::new();
    if !result.missing_binaries.is_empty() {
        lines.push("Missing required tools:".to_string());
        for binary in &result.missing_binaries {
            lines.push(format!("  • {} (install: {})", binary, install_hint(binary)));
        }
    }
    if !result.outdated.is_empty() {
        lines.push("Unsupported tool versions:".to_string());
        lines.extend(result.outdated.iter().map(|problem| format!("  • {}", problem)));
    }
    lines.join("\n")
}

/// Verify tools and turn a miss into a `Preflight` error.
pub fn ensure_ready(answers: &Answers) -> Result<()> {
    let result = verify_environment(answers);
    if !result.is_ok() {
        return Err(HeadstartError::preflight(describe_failure(&result)));
    }
    info!("Preflight checks passed");
    Ok(())
}

/// `HEADSTART_SKIP_PREFLIGHT=1` (or `true`) disables the check
pub fn should_skip_preflight() -> bool {
    let skip = std::env::var("HEADSTART_SKIP_PREFLIGHT")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if skip {
        warn!("Preflight checks skipped (HEADSTART_SKIP_PREFLIGHT)");
    }
    skip
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::{ClientAnswers, ServerAnswers};
    use crate::types::*;

    fn server(framework: ServerFramework) -> Answers {
        Answers::server(
            "api",
            ServerAnswers {
                framework,
                deployment: Deployment::None,
            },
        )
    }

    #[test]
    fn test_binary_exists_sh() {
        assert!(binary_exists("sh"));
    }

    #[test]
    fn test_binary_exists_nonexistent() {
        assert!(!binary_exists("headstart_no_such_binary_12345"));
    }

    #[test]
    fn test_required_binaries() {
        assert_eq!(
            required_binaries(&server(ServerFramework::Flask)),
            ["sh", "python3"]
        );
        assert_eq!(
            required_binaries(&server(ServerFramework::Express)),
            ["sh", "node", "npm"]
        );

        let client = Answers::client(
            "web",
            ClientAnswers {
                framework: ClientFramework::Svelte,
                css_framework: CssFramework::Sass,
                ui_library: None,
                state_management: None,
                fetch_library: FetchLibrary::Axios,
                install_router: false,
                deployment: Deployment::None,
            },
        )
        .with_package_manager(PackageManager::Yarn);
        assert_eq!(required_binaries(&client), ["sh", "node", "yarn"]);
    }

    #[test]
    fn test_describe_failure() {
        let result = PreflightResult {
            missing_binaries: vec!["pnpm".to_string()],
            ..Default::default()
        };
        assert!(!result.is_ok());
        let text = describe_failure(&result);
        assert!(text.contains("pnpm (install: npm install -g pnpm)"));
        assert!(!text.contains("Unsupported"));
    }

    #[test]
    fn test_major_version() {
        assert_eq!(major_version("1.22.19"), Some(1));
        assert_eq!(major_version("v4.1.0\n"), Some(4));
        assert_eq!(major_version("unknown"), None);
    }

    #[test]
    fn test_yarn_classic_is_rejected() {
        let problem = yarn_version_problem("1.22.19").unwrap();
        assert!(problem.contains("yarn 1.22.19 has no `yarn dlx`"));
        assert_eq!(yarn_version_problem("4.1.0"), None);
        assert_eq!(yarn_version_problem("garbage"), None);

        let result = PreflightResult {
            outdated: vec![problem],
            ..Default::default()
        };
        assert!(!result.is_ok());
        assert!(describe_failure(&result).starts_with("Unsupported tool versions:"));
    }

    #[test]
    fn test_tool_version_of_missing_binary() {
        assert_eq!(tool_version("headstart_no_such_binary_12345"), None);
    }

    #[test]
    fn test_sh_is_never_missing() {
        let result = verify_environment(&server(ServerFramework::Flask));
        assert!(!result.missing_binaries.contains(&"sh".to_string()));
    }
}
