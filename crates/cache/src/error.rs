/// Errors from the durable cache layer.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Reading or writing the backing file failed.
    #[error("Cache I/O error on '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The in-memory mapping could not be encoded.
    #[error("Cache serialization error on '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The key cannot be mapped onto the backing store.
    #[error("Invalid cache key '{0}'")]
    InvalidKey(String),
}
