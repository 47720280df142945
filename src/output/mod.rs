//! Output renderers for `inspect`: terminal and JSON.

pub mod json;
pub mod terminal;

use crate::models::Evaluation;

/// Trait for rendering an evaluation to an output format.
pub trait OutputRenderer {
    /// Render an evaluation to a string.
    fn render(&self, evaluation: &Evaluation) -> String;
}
