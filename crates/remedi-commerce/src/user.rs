//! User directory records.
//!
//! Credentials live in the identity provider; this record is what the
//! backend keeps alongside them: display data, role, and the device token
//! used for push delivery.

use crate::ids::UserId;
use serde::{Deserialize, Serialize};

/// Role of a directory user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Store administrator, receives purchase notifications.
    Admin,
    /// Regular shopper.
    #[default]
    Customer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Customer => "customer",
        }
    }
}

/// A user directory record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Identity-provider uid, used as the document key.
    #[serde(rename = "_id")]
    pub uid: UserId,
    /// Display name.
    pub username: String,
    /// Contact email (mirrors the provider account).
    pub email: String,
    /// Directory role.
    #[serde(default)]
    pub role: UserRole,
    /// Push-messaging device token, when the user registered one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_token: Option<String>,
}

impl User {
    /// Create a customer record.
    pub fn new(uid: UserId, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            uid,
            username: username.into(),
            email: email.into(),
            role: UserRole::Customer,
            device_token: None,
        }
    }

    /// Check whether the user is an administrator.
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_customer() {
        let user = User::new(UserId::new("uid-1"), "sara", "sara@example.com");
        assert_eq!(user.role, UserRole::Customer);
        assert!(!user.is_admin());
        assert!(user.device_token.is_none());
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&UserRole::Admin).unwrap();
        assert_eq!(json, "\"admin\"");
    }
}
