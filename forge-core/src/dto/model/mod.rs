//! Model DTOs

use serde::{Deserialize, Serialize};

/// Request to register a model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateModel {
    pub name: String,
}
