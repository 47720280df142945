//! cpd-reply — answers developer replies to code-review bot suggestions
//! (library crate).
//!
//! Re-exports public modules for integration tests and external use.

pub mod config;
pub mod constants;
pub mod context;
pub mod env;
pub mod evaluator;
pub mod github;
pub mod models;
pub mod orchestrator;
pub mod output;
pub mod prompt;
pub mod providers;
pub mod thread;
