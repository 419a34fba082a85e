//! Prompt template loading and rendering via `minijinja`.
//!
//! Three templates ship embedded in the binary: `system`, `profile`, and
//! `image`. A templates directory may override any of them by providing
//! `<name>.j2`, so operators can tune the prose without recompiling.

use std::path::Path;

use minijinja::Environment;
use multiverse_types::Universe;

use crate::error::EnrichError;

/// Template names and their embedded defaults.
const TEMPLATES: [(&str, &str); 3] = [
    ("system", include_str!("../templates/system.j2")),
    ("profile", include_str!("../templates/profile.j2")),
    ("image", include_str!("../templates/image.j2")),
];

/// Manages prompt template loading and rendering.
pub struct PromptEngine {
    env: Environment<'static>,
}

impl std::fmt::Debug for PromptEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptEngine").finish_non_exhaustive()
    }
}

/// The rendered profile prompt ready to send to a text backend.
#[derive(Debug, Clone)]
pub struct RenderedPrompt {
    /// System message establishing the archivist persona.
    pub system: String,
    /// User message describing the base universe and the expected JSON.
    pub user: String,
}

impl PromptEngine {
    /// Create an engine with only the embedded templates.
    pub fn embedded() -> Result<Self, EnrichError> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template_owned(name, source.to_owned())
                .map_err(|e| EnrichError::Template(format!("failed to add {name} template: {e}")))?;
        }
        Ok(Self { env })
    }

    /// Create an engine, preferring `<dir>/<name>.j2` over the embedded
    /// template wherever that file exists.
    pub fn with_overrides(dir: &Path) -> Result<Self, EnrichError> {
        let mut env = Environment::new();
        for (name, embedded) in TEMPLATES {
            let path = dir.join(format!("{name}.j2"));
            let source = if path.is_file() {
                std::fs::read_to_string(&path).map_err(|e| {
                    EnrichError::Template(format!("failed to read {}: {e}", path.display()))
                })?
            } else {
                embedded.to_owned()
            };
            env.add_template_owned(name, source)
                .map_err(|e| EnrichError::Template(format!("failed to add {name} template: {e}")))?;
        }
        Ok(Self { env })
    }

    /// Render the profile prompt for a base universe.
    pub fn render_profile(&self, universe: &Universe) -> Result<RenderedPrompt, EnrichError> {
        let ctx = context(universe)?;
        Ok(RenderedPrompt {
            system: self.render("system", &ctx)?,
            user: self.render("profile", &ctx)?,
        })
    }

    /// Render the image prompt for a base universe.
    pub fn render_image(&self, universe: &Universe) -> Result<String, EnrichError> {
        self.render("image", &context(universe)?)
    }

    fn render(&self, name: &str, ctx: &serde_json::Value) -> Result<String, EnrichError> {
        self.env
            .get_template(name)
            .map_err(|e| EnrichError::Template(format!("missing {name} template: {e}")))?
            .render(ctx)
            .map_err(|e| EnrichError::Template(format!("{name} render failed: {e}")))
    }
}

/// Template context: the universe in its wire shape plus display labels.
fn context(universe: &Universe) -> Result<serde_json::Value, EnrichError> {
    Ok(serde_json::json!({
        "universe": serde_json::to_value(universe)?,
        "gravity": universe.planet.gravity_label(),
        "war": universe.history.last_war.to_string(),
    }))
}
