//! Natural-language content for task names, descriptions, and comments.
//!
//! Generators only see the [`TextGenerator`] capability. [`TemplateText`]
//! works with zero configuration; [`NetworkText`] calls an OpenAI-compatible
//! chat endpoint and falls back to the templates on any failure.

mod network;
mod templates;

pub use network::{NetworkText, TextError};
pub use templates::{TemplateText, project_name_templates};

use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::ProjectType;

/// Source of free-form text for generated entities.
///
/// Implementations draw any randomness they need from the supplied RNG so a
/// seeded run stays reproducible.
pub trait TextGenerator: Send + Sync {
    /// A task title appropriate for the project type.
    fn task_name(&self, project_type: ProjectType, rng: &mut dyn RngCore) -> String;

    /// A task description. May be empty.
    fn task_description(
        &self,
        task_name: &str,
        project_type: ProjectType,
        rng: &mut dyn RngCore,
    ) -> String;

    /// A comment left on a task.
    fn comment(&self, task_name: &str, project_type: ProjectType, rng: &mut dyn RngCore)
    -> String;
}

/// Which text backend a run uses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextBackend {
    /// Deterministic template text.
    #[default]
    Template,
    /// OpenAI-compatible chat completions endpoint.
    Network {
        endpoint: String,
        api_key: String,
        model: String,
    },
}

/// Builds the text generator selected by configuration.
///
/// A network backend whose HTTP client cannot be constructed degrades to
/// templates with a warning.
pub fn build_text_generator(backend: &TextBackend) -> Box<dyn TextGenerator> {
    match backend {
        TextBackend::Template => {
            info!("Using template-based text generation");
            Box::new(TemplateText::new())
        }
        TextBackend::Network {
            endpoint,
            api_key,
            model,
        } => match NetworkText::new(endpoint, api_key, model) {
            Ok(generator) => {
                info!("Using network text generation via {endpoint} ({model})");
                Box::new(generator)
            }
            Err(e) => {
                warn!("Could not initialize network text client: {e}; using templates");
                Box::new(TemplateText::new())
            }
        },
    }
}
