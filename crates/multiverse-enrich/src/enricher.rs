//! The LLM-backed [`Enricher`].
//!
//! One enrichment is two calls. The text backend writes the profile, and
//! then the optional image backend renders the portrait. Text failures fail
//! the enrichment. Image failures only swap in the placeholder image.

use std::sync::Arc;

use futures::future::BoxFuture;
use multiverse_core::enricher::{Enricher, EnrichmentFailure, EnrichmentRequest};
use multiverse_core::sync::PhaseReporter;
use multiverse_types::{EnrichmentOverlay, EnrichmentPhase, Universe};
use tracing::{debug, info, warn};

use crate::config::EnrichConfig;
use crate::error::EnrichError;
use crate::image::ImageBackend;
use crate::llm::LlmBackend;
use crate::parse::parse_profile;
use crate::prompt::PromptEngine;

/// Enricher calling a text backend and, optionally, an image backend.
#[derive(Debug, Clone)]
pub struct LlmEnricher {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    prompts: PromptEngine,
    text: LlmBackend,
    image: Option<ImageBackend>,
    placeholder_image: Option<String>,
}

impl LlmEnricher {
    /// Build an enricher from environment-derived configuration.
    ///
    /// `placeholder_image` is used whenever no image could be produced.
    pub fn from_config(
        config: &EnrichConfig,
        placeholder_image: Option<String>,
    ) -> Result<Self, EnrichError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EnrichError::Config(format!("failed to build HTTP client: {e}")))?;

        let prompts = match config.templates_dir.as_deref() {
            Some(dir) => PromptEngine::with_overrides(std::path::Path::new(dir))?,
            None => PromptEngine::embedded()?,
        };
        let text = LlmBackend::new(client.clone(), &config.text_backend);
        let image = config
            .image_backend
            .as_ref()
            .map(|cfg| ImageBackend::new(client, cfg));

        info!(
            backend = text.name(),
            model = text.model(),
            image_model = image.as_ref().map(ImageBackend::model),
            "enrichment backends configured"
        );

        Ok(Self::from_parts(prompts, text, image, placeholder_image))
    }

    /// Assemble an enricher from already-built parts.
    pub fn from_parts(
        prompts: PromptEngine,
        text: LlmBackend,
        image: Option<ImageBackend>,
        placeholder_image: Option<String>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                prompts,
                text,
                image,
                placeholder_image,
            }),
        }
    }

    /// Run one enrichment for `universe`, reporting progress to `phase`.
    pub async fn describe(
        &self,
        universe: &Universe,
        phase: &PhaseReporter,
    ) -> Result<EnrichmentOverlay, EnrichError> {
        let inner = &self.inner;

        let _ = phase.report(EnrichmentPhase::ScanningCoordinates).await;
        let prompt = inner.prompts.render_profile(universe)?;
        let raw = inner.text.complete(&prompt, universe.seed).await?;
        let mut overlay = parse_profile(&raw)?;
        debug!(seed = universe.seed.value(), "profile recovered");

        let _ = phase.report(EnrichmentPhase::RenderingVisuals).await;
        let rendered = match &inner.image {
            Some(backend) => {
                let image_prompt = inner.prompts.render_image(universe)?;
                Some(backend.generate(&image_prompt).await)
            }
            None => None,
        };
        overlay.image_url = choose_image(rendered, inner.placeholder_image.as_deref());

        Ok(overlay)
    }
}

impl Enricher for LlmEnricher {
    fn enrich(
        &self,
        request: EnrichmentRequest,
        phase: PhaseReporter,
    ) -> BoxFuture<'static, Result<EnrichmentOverlay, EnrichmentFailure>> {
        let this = self.clone();
        Box::pin(async move {
            this.describe(&request.universe, &phase)
                .await
                .map_err(EnrichmentFailure::from)
        })
    }
}

/// Pick the image reference: a rendered image if there is one, the
/// placeholder otherwise.
fn choose_image(
    rendered: Option<Result<Option<String>, EnrichError>>,
    placeholder: Option<&str>,
) -> Option<String> {
    match rendered {
        Some(Ok(Some(image))) => return Some(image),
        Some(Ok(None)) => warn!("image backend returned no image data, using placeholder"),
        Some(Err(e)) => warn!(error = %e, "image generation failed, using placeholder"),
        None => {}
    }
    placeholder.map(ToOwned::to_owned)
}
