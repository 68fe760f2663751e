//! Startup image backfill for the storefront catalog.
//!
//! [`backfill::ImageBackfill`] walks the category table and then the
//! product table, asks an [`ImageGenerator`](lumina_imagegen::ImageGenerator)
//! for every slot missing from the caches, and persists each success.
//! [`loading::LoadingFlag`] tells observers when the walk is over.

pub mod backfill;
pub mod config;
pub mod error;
pub mod loading;

pub use backfill::{BackfillPolicy, BackfillReport, ImageBackfill, RunOutcome};
pub use config::BackfillConfig;
pub use error::{BackfillError, ConfigError};
pub use loading::LoadingFlag;
