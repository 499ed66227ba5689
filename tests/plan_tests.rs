//! Plan builder integration tests
//!
//! Exercise answers files end to end: JSON on disk -> Answers -> Plan.

use std::fs;
use std::path::Path;

use headstart::{
    build_plan, Action, ActionCatalog, Answers, ClientFramework, FileMutation, HeadstartError,
    PackageManager, Phase,
};
use tempfile::TempDir;

fn write_answers(dir: &Path, json: &str) -> std::path::PathBuf {
    let path = dir.join("answers.json");
    fs::write(&path, json).unwrap();
    path
}

fn plan_from_json(json: &str) -> headstart::Result<headstart::Plan> {
    let dir = TempDir::new().unwrap();
    let path = write_answers(dir.path(), json);
    let answers = Answers::load_from_file(&path).unwrap();
    let catalog = ActionCatalog::for_answers(&answers)?;
    build_plan(&answers, &catalog, dir.path())
}

#[test]
fn cra_with_router_and_redux() {
    let plan = plan_from_json(
        r#"{
            "app_name": "shop",
            "package_manager": "yarn",
            "project": {
                "kind": "client",
                "framework": "react-cra",
                "css_framework": "bootstrap",
                "ui_library": "material-ui",
                "state_management": "redux",
                "fetch_library": "axios",
                "install_router": true,
                "deployment": "vercel"
            }
        }"#,
    )
    .unwrap();

    let lines: Vec<String> = plan
        .steps()
        .iter()
        .map(|s| match &s.action {
            Action::Command { line, .. } => line.clone(),
            Action::FileMutation(m) => m.to_string(),
        })
        .collect();

    assert_eq!(
        lines,
        [
            "yarn dlx create-react-app shop",
            "yarn add bootstrap",
            "yarn add @mui/material @emotion/react @emotion/styled",
            "yarn add @reduxjs/toolkit react-redux",
            "yarn add axios",
            "yarn add react-router-dom@latest",
        ]
    );
}

#[test]
fn cra_tailwind_writes_commonjs_config() {
    let plan = plan_from_json(
        r#"{
            "app_name": "site",
            "project": {
                "kind": "client",
                "framework": "react-cra",
                "css_framework": "tailwind",
                "fetch_library": "fetch-api"
            }
        }"#,
    )
    .unwrap();

    let write = plan
        .steps()
        .iter()
        .find_map(|s| match &s.action {
            Action::FileMutation(FileMutation::Write { contents, .. }) => Some(*contents),
            _ => None,
        })
        .unwrap();
    assert!(write.contains("module.exports"));
    assert!(write.contains("plugins: []"));
    assert!(plan.mutates("src/index.css"));
}

#[test]
fn express_server_plan() {
    let plan = plan_from_json(
        r#"{
            "app_name": "api",
            "package_manager": "pnpm",
            "project": { "kind": "server", "framework": "express" }
        }"#,
    )
    .unwrap();

    assert_eq!(plan.len(), 2);
    assert!(plan.steps().iter().all(|s| s.phase <= Phase::Install));
    assert_eq!(
        plan.steps()[0].action,
        Action::command(
            "pnpm dlx express-generator api --no-view",
            "Setting up the project template"
        )
    );
    assert_eq!(
        plan.steps()[1].action,
        Action::command("pnpm install", "Installing Express (Node.js) dependencies")
    );
}

#[test]
fn svelte_with_react_library_is_rejected() {
    let err = plan_from_json(
        r#"{
            "app_name": "web",
            "project": {
                "kind": "client",
                "framework": "svelte",
                "css_framework": "sass",
                "state_management": "mobx",
                "fetch_library": "axios"
            }
        }"#,
    )
    .unwrap_err();

    assert!(matches!(err, HeadstartError::Validation(_)));
    assert!(err.to_string().contains("MobX"));
}

#[test]
fn server_answers_ignore_frontend_fields() {
    // Unknown fields are ignored by serde, but the server payload has no
    // place to keep them, so they never reach the plan.
    let plan = plan_from_json(
        r#"{
            "app_name": "api",
            "project": { "kind": "server", "framework": "flask", "css_framework": "tailwind" }
        }"#,
    )
    .unwrap();

    assert!(!plan.mutates("tailwind.config.js"));
    assert_eq!(plan.features(), ["Project template", "Flask (Python)"]);
}

#[test]
fn every_client_framework_plans() {
    use strum::IntoEnumIterator;

    for framework in ClientFramework::iter() {
        let dir = TempDir::new().unwrap();
        let answers = Answers::client(
            "demo",
            headstart::ClientAnswers {
                framework,
                css_framework: Default::default(),
                ui_library: None,
                state_management: None,
                fetch_library: Default::default(),
                install_router: false,
                deployment: Default::default(),
            },
        )
        .with_package_manager(PackageManager::Npm);

        let catalog = ActionCatalog::client().unwrap();
        let plan = build_plan(&answers, &catalog, dir.path()).unwrap();

        // scaffold + tailwind (3) + fetch api
        assert_eq!(plan.len(), 5, "{}", framework);
    }
}
