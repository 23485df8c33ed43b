use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::models::user::User;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";
/// Id carried by `Principal::system()`. No users row exists for it.
pub const SYSTEM_USER_ID: i32 = 0;

/// The caller of a service operation. Whatever layer authenticates the
/// request builds one of these and hands it to the service explicitly.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Principal {
    pub user_id: i32,
    pub role: String,
}

impl Principal {
    pub fn user(user_id: i32) -> Self {
        Self {
            user_id,
            role: ROLE_USER.to_string(),
        }
    }

    pub fn admin(user_id: i32) -> Self {
        Self {
            user_id,
            role: ROLE_ADMIN.to_string(),
        }
    }

    /// Principal for work the process does on its own behalf (CLI, tasks).
    pub fn system() -> Self {
        Self::admin(SYSTEM_USER_ID)
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    pub fn is_system(&self) -> bool {
        self.user_id == SYSTEM_USER_ID
    }

    /// Rows owned by the caller need a caller with a users row.
    pub fn require_user(&self) -> AppResult<()> {
        if self.is_system() {
            log::warn!("System principal attempted a per-user operation");
            Err(AppError::Forbidden)
        } else {
            Ok(())
        }
    }

    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            log::warn!("User {} attempted an admin-only operation", self.user_id);
            Err(AppError::Forbidden)
        }
    }

    /// Admins may act on anyone; users only on themselves.
    pub fn require_self_or_admin(&self, user_id: i32) -> AppResult<()> {
        if self.is_admin() || self.user_id == user_id {
            Ok(())
        } else {
            log::warn!(
                "User {} is not authorized to act for user {}",
                self.user_id,
                user_id
            );
            Err(AppError::Forbidden)
        }
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            role: user.role.clone(),
        }
    }
}
