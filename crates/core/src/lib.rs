//! Domain types shared by the Lumina storefront crates.
//!
//! Holds the compiled-in catalog tables, the generated-image value types
//! with their fallback rules, and the default backfill policy constants.

pub mod catalog;
pub mod error;
pub mod images;
pub mod policy;
pub mod types;
