//! Category Model

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Menu category (read-only collaborator shape)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    /// Localized display names, keyed by language code
    pub names: HashMap<String, String>,
}
