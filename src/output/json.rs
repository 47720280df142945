//! JSON output renderer.
//!
//! Outputs `{"status": "actionable" | "skipped", "detail": {...}}`.

use crate::models::Evaluation;
use crate::output::OutputRenderer;

/// JSON output renderer.
pub struct JsonRenderer;

impl OutputRenderer for JsonRenderer {
    fn render(&self, evaluation: &Evaluation) -> String {
        serde_json::to_string_pretty(evaluation).unwrap_or_else(|_| "{}".to_string())
    }
}
