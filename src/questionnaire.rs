//! Interactive question flow
//!
//! Asks the questions in a fixed order and assembles [`Answers`]. Questions
//! that do not apply to the chosen stack are never asked: Svelte projects
//! skip the React-only ones, server projects skip everything frontend.
//!
//! | Kind   | Questions after app name and kind |
//! |--------|-----------------------------------|
//! | client | framework, package manager, CSS, UI library*, router*, fetch, state*, deployment |
//! | server | framework, package manager**, deployment |
//!
//! `*` React only, `**` Express only

use std::fmt::Display;

use strum::IntoEnumIterator;
use tracing::debug;

use crate::answers::{validate_app_name, Answers, ClientAnswers, ServerAnswers};
use crate::error::{HeadstartError, Result};
use crate::prompt::Prompter;
use crate::types::{
    ClientFramework, CssFramework, Deployment, FetchLibrary, PackageManager, ProjectKind,
    ServerFramework, StateManagement, UiLibrary,
};

pub const WELCOME: &str = "Welcome to headstart! Answer a few questions and get a ready-to-code project.";

pub const DEFAULT_APP_NAME: &str = "my-app";

/// Invalid app names are re-asked at most this many times
const MAX_NAME_ATTEMPTS: usize = 5;

/// Ask for one variant of `T`, offering every variant in declaration order.
fn choose<T, P>(prompter: &mut P, question: &str, default: T) -> Result<T>
where
    T: IntoEnumIterator + Display + PartialEq + Copy,
    P: Prompter + ?Sized,
{
    let variants: Vec<T> = T::iter().collect();
    let labels: Vec<String> = variants.iter().map(ToString::to_string).collect();
    let default_index = variants.iter().position(|v| *v == default).unwrap_or(0);

    let index = prompter.select(question, &labels, default_index)?;
    variants
        .get(index)
        .copied()
        .ok_or_else(|| HeadstartError::prompt(format!("Invalid choice {} for '{}'", index, question)))
}

/// Like [`choose`], with a leading "None" option mapping to `None`.
fn choose_optional<T, P>(prompter: &mut P, question: &str) -> Result<Option<T>>
where
    T: IntoEnumIterator + Display + Copy,
    P: Prompter + ?Sized,
{
    let variants: Vec<T> = T::iter().collect();
    let mut labels = vec!["None".to_string()];
    labels.extend(variants.iter().map(ToString::to_string));

    match prompter.select(question, &labels, 0)? {
        0 => Ok(None),
        index => variants
            .get(index - 1)
            .copied()
            .map(Some)
            .ok_or_else(|| HeadstartError::prompt(format!("Invalid choice {} for '{}'", index, question))),
    }
}

fn ask_app_name<P: Prompter + ?Sized>(prompter: &mut P) -> Result<String> {
    for _ in 0..MAX_NAME_ATTEMPTS {
        let name = prompter.input("What is the name of your app?", DEFAULT_APP_NAME)?;
        match validate_app_name(&name) {
            Ok(()) => return Ok(name),
            Err(e) => prompter.message(&e.to_string()),
        }
    }
    Err(HeadstartError::validation("No valid app name given"))
}

fn ask_client<P: Prompter + ?Sized>(prompter: &mut P) -> Result<(ClientAnswers, PackageManager)> {
    let framework: ClientFramework = choose(
        prompter,
        "Which framework would you like to use?",
        ClientFramework::default(),
    )?;
    let package_manager = choose(
        prompter,
        "Which package manager should install dependencies?",
        PackageManager::default(),
    )?;
    let css_framework = choose(
        prompter,
        "Which CSS framework would you like to use?",
        CssFramework::default(),
    )?;

    let react = framework.is_react();
    let ui_library = if react {
        choose_optional::<UiLibrary, _>(prompter, "Would you like to add a UI library?")?
    } else {
        None
    };
    let install_router =
        react && prompter.confirm("Would you like to install React Router DOM?", false)?;
    let fetch_library = choose(
        prompter,
        "Which library would you like to use for fetching data?",
        FetchLibrary::default(),
    )?;
    let state_management = if react {
        choose_optional::<StateManagement, _>(
            prompter,
            "Which state management tool would you like to use?",
        )?
    } else {
        None
    };
    let deployment = choose(
        prompter,
        "Where would you like to deploy your project?",
        Deployment::default(),
    )?;

    Ok((
        ClientAnswers {
            framework,
            css_framework,
            ui_library,
            state_management,
            fetch_library,
            install_router,
            deployment,
        },
        package_manager,
    ))
}

fn ask_server<P: Prompter + ?Sized>(prompter: &mut P) -> Result<(ServerAnswers, PackageManager)> {
    let framework: ServerFramework = choose(
        prompter,
        "Which backend framework would you like to use?",
        ServerFramework::default(),
    )?;
    let package_manager = if framework.is_python() {
        PackageManager::default()
    } else {
        choose(
            prompter,
            "Which package manager should install dependencies?",
            PackageManager::default(),
        )?
    };
    let deployment = choose(
        prompter,
        "Where would you like to deploy your project?",
        Deployment::default(),
    )?;

    Ok((ServerAnswers { framework, deployment }, package_manager))
}

/// Run the full question flow.
pub fn run_questionnaire<P: Prompter + ?Sized>(prompter: &mut P) -> Result<Answers> {
    prompter.message(WELCOME);

    let app_name = ask_app_name(prompter)?;
    let kind: ProjectKind = choose(
        prompter,
        "What kind of project are you creating?",
        ProjectKind::default(),
    )?;

    let answers = match kind {
        ProjectKind::Client => {
            let (client, pm) = ask_client(prompter)?;
            Answers::client(app_name, client).with_package_manager(pm)
        }
        ProjectKind::Server => {
            let (server, pm) = ask_server(prompter)?;
            Answers::server(app_name, server).with_package_manager(pm)
        }
    };

    debug!(?answers, "Questionnaire complete");
    answers.validate()?;
    Ok(answers)
}
