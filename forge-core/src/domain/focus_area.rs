//! Focus area domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tagging metadata that steers problem text generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusArea {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub prompt_guidance: String,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FocusArea {
    /// Text contributed to a generation prompt
    ///
    /// Falls back to the name when no guidance was written.
    pub fn prompt_clause(&self) -> &str {
        let guidance = self.prompt_guidance.trim();
        if guidance.is_empty() {
            &self.name
        } else {
            guidance
        }
    }
}
