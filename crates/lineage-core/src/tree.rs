//! Family tree (namespace) types

use crate::error::{Error, Result};
use crate::limits::validate_tree_name;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique identifier for a family tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeId(pub Ulid);

impl TreeId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    pub fn from_string(s: &str) -> std::result::Result<Self, ulid::DecodeError> {
        Ok(Self(Ulid::from_string(s)?))
    }
}

impl Default for TreeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TreeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named family tree; its records live in a separate dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyTree {
    pub id: TreeId,

    /// Tree name (unique, alphanumeric with underscores/hyphens)
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub created_at: DateTime<Utc>,

    /// Last time the dataset was saved
    pub updated_at: DateTime<Utc>,
}

impl FamilyTree {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: TreeId::new(),
            name: name.into(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validate tree name (alphanumeric, underscores, hyphens only)
    pub fn validate_name(name: &str) -> bool {
        validate_tree_name(name).is_ok()
            && name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    }

    /// Like `validate_name`, as an error
    pub fn check_name(name: &str) -> Result<()> {
        validate_tree_name(name)?;
        if Self::validate_name(name) {
            Ok(())
        } else {
            Err(Error::InvalidTreeName(format!(
                "'{}' (use letters, digits, '_' or '-')",
                name
            )))
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
