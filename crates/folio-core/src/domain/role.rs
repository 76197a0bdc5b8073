//! User roles and the acting user of a write operation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{FolioError, FolioResult, UserId};

/// User roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Registered reader.
    #[default]
    User,
    /// Site owner with full access.
    Admin,
}

impl UserRole {
    /// Parses a role from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" => Some(Self::User),
            "admin" | "administrator" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// The authenticated user performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Acting user.
    pub user_id: UserId,
    /// Role of the acting user.
    pub role: UserRole,
}

impl Actor {
    /// Creates an actor.
    #[must_use]
    pub const fn new(user_id: UserId, role: UserRole) -> Self {
        Self { user_id, role }
    }

    /// Creates an admin actor.
    #[must_use]
    pub const fn admin(user_id: UserId) -> Self {
        Self::new(user_id, UserRole::Admin)
    }

    /// Creates a regular user actor.
    #[must_use]
    pub const fn user(user_id: UserId) -> Self {
        Self::new(user_id, UserRole::User)
    }

    /// Returns true for administrators.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }

    /// Fails with `Forbidden` unless the actor is an administrator.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Forbidden`] for non-admin actors.
    pub fn require_admin(&self) -> FolioResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(FolioError::forbidden("Insufficient permissions"))
        }
    }
}
