//! Sequential, rate-limited image backfill.
//!
//! One generation call is in flight at a time. Every successful call is
//! merged into its cache, persisted, and followed by a fixed pause. A
//! quota signal ends the whole walk; so does a persistence failure.
//! Whatever happens, the [`LoadingFlag`] is cleared exactly once.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;

use lumina_cache::{CategoryImageCache, ProductImageCache};
use lumina_core::catalog::{Category, Product, CATEGORIES, PRODUCTS};
use lumina_core::images::{ProductImages, ProductSlot};
use lumina_core::policy::DEFAULT_RATE_LIMIT_INTERVAL_MS;
use lumina_core::types::ImagePayload;
use lumina_imagegen::{GenerationOutcome, ImageGenerator};

use crate::error::BackfillError;
use crate::loading::LoadingFlag;

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Pacing of the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackfillPolicy {
    /// Pause after each successful generation call.
    pub rate_limit_interval: Duration,
}

impl Default for BackfillPolicy {
    fn default() -> Self {
        Self {
            rate_limit_interval: Duration::from_millis(DEFAULT_RATE_LIMIT_INTERVAL_MS),
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every entry was visited.
    Completed,
    /// The upstream quota ran out; remaining entries keep their fallbacks.
    QuotaExhausted,
    /// An unexpected error ended the run.
    Aborted(String),
}

/// Summary of one backfill run.
#[derive(Debug, Clone, Serialize)]
pub struct BackfillReport {
    pub outcome: RunOutcome,
    /// Slots filled by this run.
    pub generated: u32,
    /// Slots already cached when visited.
    pub skipped: u32,
    /// Calls that produced nothing usable.
    pub empty: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BackfillReport {
    fn start() -> Self {
        let now = Utc::now();
        Self {
            outcome: RunOutcome::Completed,
            generated: 0,
            skipped: 0,
            empty: 0,
            started_at: now,
            finished_at: now,
        }
    }
}

// ---------------------------------------------------------------------------
// ImageBackfill
// ---------------------------------------------------------------------------

/// Fills missing category and product imagery from a generator.
pub struct ImageBackfill<G> {
    generator: G,
    categories: Arc<CategoryImageCache>,
    products: Arc<ProductImageCache>,
    policy: BackfillPolicy,
    category_table: Vec<Category>,
    product_table: Vec<Product>,
}

impl<G: ImageGenerator> ImageBackfill<G> {
    /// Backfill over the full compiled-in catalog.
    pub fn new(
        generator: G,
        categories: Arc<CategoryImageCache>,
        products: Arc<ProductImageCache>,
        policy: BackfillPolicy,
    ) -> Self {
        Self {
            generator,
            categories,
            products,
            policy,
            category_table: CATEGORIES.to_vec(),
            product_table: PRODUCTS.to_vec(),
        }
    }

    /// Restrict the walk to the given entries, visited in the given order.
    pub fn with_catalog(mut self, categories: &[Category], products: &[Product]) -> Self {
        self.category_table = categories.to_vec();
        self.product_table = products.to_vec();
        self
    }

    /// Walk the catalog once, then clear `loading`.
    pub async fn run(&self, loading: &LoadingFlag) -> BackfillReport {
        let finish = FinishOnDrop(loading);
        let mut report = BackfillReport::start();

        tracing::info!(
            categories = self.category_table.len(),
            products = self.product_table.len(),
            interval_ms = self.policy.rate_limit_interval.as_millis() as u64,
            "Starting image backfill",
        );

        report.outcome = match self.walk(&mut report).await {
            Ok(()) => RunOutcome::Completed,
            Err(BackfillError::QuotaExhausted) => {
                tracing::warn!("Image backfill halted: generation quota exhausted");
                RunOutcome::QuotaExhausted
            }
            Err(e) => {
                tracing::warn!(error = %e, "Image backfill paused, using fallback imagery");
                RunOutcome::Aborted(e.to_string())
            }
        };
        report.finished_at = Utc::now();

        drop(finish);

        tracing::info!(
            outcome = ?report.outcome,
            generated = report.generated,
            skipped = report.skipped,
            empty = report.empty,
            "Image backfill finished",
        );

        report
    }

    async fn walk(&self, report: &mut BackfillReport) -> Result<(), BackfillError> {
        for category in &self.category_table {
            if self.categories.contains(category.id).await {
                report.skipped += 1;
                continue;
            }

            if let Some(image) = self.request(category.id, "category", category.prompt, report).await? {
                self.categories.merge_and_flush(category.id, image).await?;
                self.record_success(category.id, "category", report).await;
            }
        }

        for product in &self.product_table {
            let cached = self.products.get(product.id).await.unwrap_or_default();

            for (slot, prompt) in [
                (ProductSlot::Main, product.image_prompt),
                (ProductSlot::Texture, product.texture_prompt),
            ] {
                if cached.has(slot) {
                    report.skipped += 1;
                    continue;
                }

                if let Some(image) = self.request(product.id, slot.as_str(), prompt, report).await? {
                    self.products
                        .merge_and_flush(product.id, ProductImages::with_slot(slot, image))
                        .await?;
                    self.record_success(product.id, slot.as_str(), report).await;
                }
            }
        }

        Ok(())
    }

    /// One generator call; quota exhaustion becomes an error that ends the walk.
    async fn request(
        &self,
        entry_id: &str,
        slot: &str,
        prompt: &str,
        report: &mut BackfillReport,
    ) -> Result<Option<ImagePayload>, BackfillError> {
        tracing::debug!(entry_id, slot, "Requesting generated image");

        match self.generator.generate(prompt).await {
            GenerationOutcome::Success(image) => Ok(Some(image)),
            GenerationOutcome::Empty => {
                report.empty += 1;
                tracing::info!(entry_id, slot, "No image generated, keeping fallback");
                Ok(None)
            }
            GenerationOutcome::QuotaExhausted => Err(BackfillError::QuotaExhausted),
        }
    }

    /// Count the fill and hold off before the next call.
    async fn record_success(&self, entry_id: &str, slot: &str, report: &mut BackfillReport) {
        report.generated += 1;
        tracing::info!(entry_id, slot, "Generated image cached");
        tokio::time::sleep(self.policy.rate_limit_interval).await;
    }
}

/// Clears the loading flag even if the run future is dropped or panics.
struct FinishOnDrop<'a>(&'a LoadingFlag);

impl Drop for FinishOnDrop<'_> {
    fn drop(&mut self) {
        self.0.finish();
    }
}

impl<G: ImageGenerator + 'static> ImageBackfill<G> {
    /// Run on a background task so callers keep serving while it works.
    pub fn spawn(self, loading: Arc<LoadingFlag>) -> JoinHandle<BackfillReport> {
        tokio::spawn(async move { self.run(&loading).await })
    }
}
