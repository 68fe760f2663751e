//! Default backfill policy and storage key constants.
//!
//! Binaries override these through environment variables; the library
//! crates take them as plain values so the policy can be tightened in tests.

// ---------------------------------------------------------------------------
// Rate limiting / retry
// ---------------------------------------------------------------------------

/// Pause after every successful generation call, in milliseconds.
pub const DEFAULT_RATE_LIMIT_INTERVAL_MS: u64 = 3000;

/// Retries after the first failed attempt (generic failures only).
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// Backoff before retry `n` is `base * 2^(n-1)` milliseconds.
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 2000;

// ---------------------------------------------------------------------------
// Generation request
// ---------------------------------------------------------------------------

/// Every generated image is square.
pub const IMAGE_ASPECT_RATIO: &str = "1:1";

/// Image-capable Gemini model used when none is configured.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Public Gemini REST endpoint.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

// ---------------------------------------------------------------------------
// Durable cache keys
// ---------------------------------------------------------------------------

/// Storage key of the product image cache.
pub const PRODUCT_CACHE_KEY: &str = "lumina_ai_images_cache_v2";

/// Storage key of the category image cache.
pub const CATEGORY_CACHE_KEY: &str = "lumina_ai_images_cache_v2_categories";

/// Envelope field the product mapping is nested under in its document.
pub const PRODUCT_CACHE_ENVELOPE: &str = "products";
