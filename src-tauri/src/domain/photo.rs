//! Progress photos taken by the user for a pattern

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: i64,
    pub pattern_id: String,
    pub uri: String,
    pub created_at: i64,
}
