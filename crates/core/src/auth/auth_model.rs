//! Authentication domain models.

use serde::{Deserialize, Serialize};

/// The identity a validated bearer token belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub user_name: String,
}

impl AuthenticatedUser {
    /// True when the identifier names this user, by id or by name.
    /// Callers accept either form, the way the stores do.
    pub fn matches_identifier(&self, identifier: &str) -> bool {
        self.user_id == identifier || self.user_name == identifier
    }
}
