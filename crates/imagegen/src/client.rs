//! Retrying image generation client.
//!
//! [`ImageClient`] wraps any [`ImageBackend`] and turns its raw results
//! into a [`GenerationOutcome`]:
//!
//! - an image part becomes [`GenerationOutcome::Success`];
//! - a reply without one becomes [`GenerationOutcome::Empty`], not retried;
//! - a quota failure becomes [`GenerationOutcome::QuotaExhausted`] at once;
//! - any other failure is retried per [`RetryPolicy`], then reported as
//!   [`GenerationOutcome::Empty`].

use async_trait::async_trait;

use lumina_core::types::ImagePayload;

use crate::api::ImageGenError;
use crate::quota::is_quota_exhausted;
use crate::retry::RetryPolicy;

/// One raw generation call, no retries.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<Option<ImagePayload>, ImageGenError>;
}

/// Result of generating one image for one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// A `data:` URI ready to cache.
    Success(ImagePayload),
    /// Nothing usable came back; do not ask again this session.
    Empty,
    /// The upstream quota is spent; stop issuing calls.
    QuotaExhausted,
}

/// Prompt in, [`GenerationOutcome`] out. The seam the backfill depends on.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> GenerationOutcome;
}

/// [`ImageBackend`] plus retry and quota handling.
pub struct ImageClient<B> {
    backend: B,
    policy: RetryPolicy,
}

impl<B: ImageBackend> ImageClient<B> {
    pub fn new(backend: B) -> Self {
        Self::with_policy(backend, RetryPolicy::default())
    }

    pub fn with_policy(backend: B, policy: RetryPolicy) -> Self {
        Self { backend, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[async_trait]
impl<B: ImageBackend> ImageGenerator for ImageClient<B> {
    async fn generate(&self, prompt: &str) -> GenerationOutcome {
        if prompt.trim().is_empty() {
            tracing::warn!("Refusing to generate an image for an empty prompt");
            return GenerationOutcome::Empty;
        }

        let mut retry = 0u32;

        loop {
            match self.backend.generate_image(prompt).await {
                Ok(Some(image)) => return GenerationOutcome::Success(image),
                Ok(None) => {
                    tracing::info!("Generation returned no image part");
                    return GenerationOutcome::Empty;
                }
                Err(e) if is_quota_exhausted(&e) => {
                    tracing::error!(error = %e, "Image generation quota exhausted -- stopping generation");
                    return GenerationOutcome::QuotaExhausted;
                }
                Err(e) => {
                    retry += 1;
                    if retry > self.policy.max_retries {
                        tracing::error!(
                            attempts = retry,
                            error = %e,
                            "Image generation failed after retries",
                        );
                        return GenerationOutcome::Empty;
                    }

                    let delay = self.policy.backoff_delay(retry);
                    tracing::warn!(
                        attempt = retry,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Image generation attempt {retry} failed, retrying",
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
