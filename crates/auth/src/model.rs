use hrkit_storage::RecordId;
use serde::{Deserialize, Serialize};

/// User account record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub username: String,
    pub email: String,
    /// bcrypt hash; the plaintext is never stored
    #[serde(rename = "password")]
    pub password_hash: String,
}

impl User {
    /// Create a new user with an already hashed password
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: None,
            username,
            email,
            password_hash,
        }
    }
}
