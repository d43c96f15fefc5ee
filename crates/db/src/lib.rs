//! `forum-db`: persistence for categories, topics and users.
//!
//! Every collection lives as one JSON array under a fixed key of a
//! [`KeyValueStore`]. Repositories load the whole array, mutate an owned copy
//! and write the whole array back.

pub mod collection;
pub mod config;
pub mod error;
pub mod kv;
pub mod models;
pub mod repositories;

pub use error::{DbError, DbResult, StoreError};
pub use kv::{FileStore, KeyValueStore, MemoryStore};

use config::StoreConfig;

/// Key holding the category array.
pub const CATEGORIES_KEY: &str = "forumCategories";
/// Key holding the topic array (replies are nested inside topics).
pub const TOPICS_KEY: &str = "forumTopics";
/// Key holding the user array.
pub const USERS_KEY: &str = "forumUsers";
/// Key holding the logged-in user record.
pub const CURRENT_USER_KEY: &str = "currentUser";

/// Open the file-backed store described by `config`.
pub fn open_store(config: &StoreConfig) -> Result<FileStore, StoreError> {
    let store = FileStore::open(&config.data_dir)?;
    Ok(match config.quota_bytes {
        Some(limit) => store.with_quota(limit),
        None => store,
    })
}
