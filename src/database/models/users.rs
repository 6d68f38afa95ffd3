//! User Records

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User database record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRecord {
    pub id: String,
    pub login_name: String,
    pub created_at: String,
}

impl UserRecord {
    pub fn new(login_name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            login_name: login_name.into(),
            created_at: super::timestamp_now(),
        }
    }
}
