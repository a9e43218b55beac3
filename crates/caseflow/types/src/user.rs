use serde::{Deserialize, Serialize};

use crate::{Role, UserId};

/// Directory record for an actor. The directory itself is external to the
/// engine; this is the projection the engine needs for authorization and
/// history snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub full_name: String,
    pub role: Role,
}

impl User {
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        full_name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            full_name: full_name.into(),
            role,
        }
    }
}
