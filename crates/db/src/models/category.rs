//! Category model.

use forum_core::types::DbId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::topic::Topic;

/// An element of the `forumCategories` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: DbId,
    pub key: String,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub created_at: String,
    #[serde(default)]
    pub protected: bool,
    /// Stored fields this model does not name, written back unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// DTO for creating a new category. Fields are validated and trimmed by
/// the repository; the key is derived from the untrimmed name.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub icon: String,
    pub description: String,
}

/// DTO for updating a category.
///
/// Only the editable fields exist here. `id`, `key`, `protected` and
/// `createdAt` cannot be expressed, and a JSON patch naming them is
/// rejected at deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
}

impl UpdateCategory {
    /// True when at least one field is supplied.
    pub fn touches_fields(&self) -> bool {
        self.name.is_some() || self.icon.is_some() || self.description.is_some()
    }
}

/// Topic and reply counts for one category, derived on demand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub topic_count: usize,
    pub reply_count: usize,
}

impl CategoryStats {
    /// Count the topics referencing `key` and the replies across them.
    /// Topics without a `replies` field contribute zero replies.
    pub fn compute(topics: &[Topic], key: &str) -> Self {
        topics
            .iter()
            .filter(|t| t.category == key)
            .fold(Self::default(), |acc, t| Self {
                topic_count: acc.topic_count + 1,
                reply_count: acc.reply_count + t.reply_count(),
            })
    }
}

/// A category together with its derived statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryWithStats {
    #[serde(flatten)]
    pub category: Category,
    pub stats: CategoryStats,
}

/// Result of a successful category delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDeletion {
    /// The removed category.
    pub category: Category,
    /// Topics removed by the cascade, or `None` if the topic cleanup failed
    /// and was skipped. The category stays deleted either way.
    pub topics_removed: Option<usize>,
}

/// What `initialize` did to guarantee the protected default exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// Storage was empty; the default is now the only category.
    Created,
    /// Other categories existed without the default; it was inserted first.
    Prepended,
    /// The default was already present; nothing was written.
    AlreadyPresent,
}
