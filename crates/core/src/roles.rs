//! Role names and the permission checks callers perform with them.
//!
//! The stores never enforce roles on categories; the reply path in the
//! topic store and the admin surfaces consult these predicates.

use serde::{Deserialize, Serialize};

pub const ROLE_FOUNDER: &str = "founder";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_PLAYER: &str = "player";

/// A user's role as persisted in the `role` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Founder,
    Admin,
    Player,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Founder => ROLE_FOUNDER,
            Role::Admin => ROLE_ADMIN,
            Role::Player => ROLE_PLAYER,
        }
    }

    /// Parse a role name; unknown names return `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            ROLE_FOUNDER => Some(Role::Founder),
            ROLE_ADMIN => Some(Role::Admin),
            ROLE_PLAYER => Some(Role::Player),
            _ => None,
        }
    }

    /// Human-readable label shown next to nicknames.
    pub fn label(self) -> &'static str {
        match self {
            Role::Founder => "⭐ Основатель",
            Role::Admin => "👑 Администратор",
            Role::Player => "🎮 Игрок",
        }
    }

    /// Founders and admins are staff.
    pub fn is_staff(self) -> bool {
        matches!(self, Role::Founder | Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Only staff may reply to topics. Everyone may create topics.
pub fn can_reply(role: Role) -> bool {
    role.is_staff()
}

/// Only staff may open the admin panel (user list, role changes).
pub fn can_access_admin(role: Role) -> bool {
    role.is_staff()
}

/// Only staff may create, edit or delete categories.
pub fn can_manage_categories(role: Role) -> bool {
    role.is_staff()
}
