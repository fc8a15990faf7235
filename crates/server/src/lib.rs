//! Server crate for the recipe finder.
//!
//! This crate contains the orchestrator that sequences the six collaborator
//! stages, plus the HTTP endpoint that exposes it.

pub mod config;
pub mod error;
pub mod http;
pub mod orchestrator;

#[cfg(test)]
mod test_support;

pub use config::{OrchestratorConfig, StageArgs};
pub use error::OrchestratorError;
pub use orchestrator::{FindResponse, RecipeOrchestrator, RecipeOut};
