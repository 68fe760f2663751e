//! One-shot image backfill.
//!
//! Fills every missing category and product image in the cache directory,
//! then exits. The run report is printed to stdout as JSON. Quota
//! exhaustion and aborted runs still exit 0: the storefront keeps working
//! on fallback imagery and the next run resumes where this one stopped.
//!
//! Configuration comes from the environment (see
//! [`BackfillConfig`](lumina_pipeline::BackfillConfig)); a `.env` file is
//! honoured.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lumina_pipeline::config::{gemini_backfill, open_caches};
use lumina_pipeline::{BackfillConfig, LoadingFlag};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lumina_backfill=info,lumina_pipeline=info,lumina_imagegen=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match BackfillConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };
    tracing::info!(
        cache_dir = %config.cache_dir.display(),
        model = %config.model,
        has_api_key = config.api_key.is_some(),
        "Loaded backfill configuration",
    );

    let (categories, products) = open_caches(config.store()).await;
    let backfill = gemini_backfill(&config, categories, products);

    let report = backfill.run(&LoadingFlag::new()).await;

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::warn!(error = %e, "Could not encode run report"),
    }
}
