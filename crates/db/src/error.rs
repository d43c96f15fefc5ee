use forum_core::error::CoreError;

/// Failures of the backing key-value medium.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Writing `key` would push total usage past the configured quota.
    #[error("Storage quota exceeded writing {key}: {needed} bytes needed, limit {limit}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },

    /// The stored value under `key` is not valid JSON for the expected shape.
    #[error("Corrupt value under {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Key contains characters the backend cannot address.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Invalid configuration: {var}={value}")]
    InvalidConfig { var: &'static str, value: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error returned by repository operations.
///
/// Domain failures (validation, missing records, protected records) come
/// from [`CoreError`]; failures of the backing store are `Persistence`.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),
}

/// Convenience alias for repository return values.
pub type DbResult<T> = Result<T, DbError>;
