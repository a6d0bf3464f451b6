//! Note Entity
//!
//! Free-text notes attached to a pattern.

use serde::{Deserialize, Serialize};

use super::entity::{new_id, now_millis};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub pattern_id: String,
    pub content: String,
    pub updated_at: i64,
}

impl Note {
    pub fn new(pattern_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            pattern_id: pattern_id.into(),
            content: content.into(),
            updated_at: now_millis(),
        }
    }
}
