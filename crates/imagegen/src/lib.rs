//! Generative-image client for storefront imagery.
//!
//! [`api::GeminiApi`] performs one raw `generateContent` call.
//! [`client::ImageClient`] layers the retry policy and quota detection on
//! top and reports a [`client::GenerationOutcome`] per prompt.

pub mod api;
pub mod client;
pub mod quota;
pub mod retry;

pub use api::{GeminiApi, ImageGenError};
pub use client::{GenerationOutcome, ImageBackend, ImageClient, ImageGenerator};
pub use retry::RetryPolicy;
