//! User model.

use forum_core::roles::Role;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An element of the `forumUsers` array; also the shape of `currentUser`.
///
/// Passwords are stored and compared in plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub password: String,
    pub nickname: String,
    pub role: Role,
    pub registered_at: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// DTO for self-registration. New users always get the `player` role.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    pub username: String,
    pub password: String,
    pub password_confirm: String,
    pub nickname: String,
}
