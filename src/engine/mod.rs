//! Engine modules: translate answers into an ordered provisioning plan.
//!
//! The engine sits between the answer model (what the user wants) and the
//! executor (what actually runs). Nothing in here spawns processes.

pub mod catalog;
pub mod plan;
pub mod templates;

pub use catalog::{Action, ActionCatalog, Feature, Phase};
pub use plan::{build_plan, Plan, PlanStep, WorkDir};
