use lumina_cache::CacheError;

/// Reasons a backfill walk stops before visiting every entry.
#[derive(Debug, thiserror::Error)]
pub enum BackfillError {
    /// The generator reported an exhausted quota.
    #[error("Image generation quota exhausted")]
    QuotaExhausted,

    /// Persisting a cache update failed.
    #[error("Cache persistence failed: {0}")]
    Cache(#[from] CacheError),
}

/// A configuration variable was present but unusable.
#[derive(Debug, thiserror::Error)]
#[error("Invalid value '{value}' for {var}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}
