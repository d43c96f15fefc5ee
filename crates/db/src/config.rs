use std::path::PathBuf;

use crate::error::StoreError;

/// Browser storage quotas are typically 5 MiB per origin.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Storage configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding one file per key (default: `forum_data`).
    pub data_dir: PathBuf,
    /// Byte quota across all keys; `None` means unlimited.
    pub quota_bytes: Option<usize>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("forum_data"),
            quota_bytes: Some(DEFAULT_QUOTA_BYTES),
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var             | Default      |
    /// |---------------------|--------------|
    /// | `FORUM_DATA_DIR`    | `forum_data` |
    /// | `FORUM_QUOTA_BYTES` | `5242880` (`0` disables the quota) |
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let data_dir = lookup("FORUM_DATA_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let quota_bytes = match lookup("FORUM_QUOTA_BYTES") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(0) => None,
                Ok(n) => Some(n),
                Err(_) => {
                    return Err(StoreError::InvalidConfig {
                        var: "FORUM_QUOTA_BYTES",
                        value: raw,
                    })
                }
            },
            None => defaults.quota_bytes,
        };

        Ok(Self {
            data_dir,
            quota_bytes,
        })
    }
}
