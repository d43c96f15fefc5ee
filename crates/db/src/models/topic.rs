//! Topic and reply models.

use forum_core::roles::Role;
use forum_core::types::DbId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An element of the `forumTopics` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: DbId,
    /// Key of the owning category.
    pub category: String,
    pub title: String,
    /// Author nickname at the time of posting.
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_role: Option<Role>,
    pub message: String,
    pub date: String,
    /// Absent in some stored topics; kept absent on write-back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replies: Option<Vec<Reply>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Topic {
    pub fn reply_count(&self) -> usize {
        self.replies.as_ref().map_or(0, Vec::len)
    }
}

/// A reply nested inside a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_role: Option<Role>,
    pub message: String,
    pub date: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// DTO for creating a topic. The author comes from the session user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTopic {
    pub category: String,
    pub title: String,
    pub message: String,
}
