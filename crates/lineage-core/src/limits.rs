//! Input validation limits for imported and edited records

/// Maximum length for a person name (256 chars)
pub const MAX_NAME_LEN: usize = 256;

/// Maximum length for free-text fields such as notes (4KB)
pub const MAX_TEXT_LEN: usize = 4 * 1024;

/// Maximum tree name length (64 chars)
pub const MAX_TREE_NAME_LEN: usize = 64;

/// Maximum records accepted from a single import file
pub const MAX_IMPORT_RECORDS: usize = 100_000;

/// Limit violation
#[derive(Debug, Clone, PartialEq)]
pub enum LimitError {
    NameTooLong { len: usize, max: usize },
    TextTooLong { field: &'static str, len: usize, max: usize },
    TreeNameTooLong { len: usize, max: usize },
    TooManyRecords { count: usize, max: usize },
    EmptyName,
    EmptyTreeName,
}

impl std::fmt::Display for LimitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameTooLong { len, max } => {
                write!(f, "Name too long: {} chars (max {})", len, max)
            }
            Self::TextTooLong { field, len, max } => {
                write!(f, "{} too long: {} chars (max {})", field, len, max)
            }
            Self::TreeNameTooLong { len, max } => {
                write!(f, "Tree name too long: {} chars (max {})", len, max)
            }
            Self::TooManyRecords { count, max } => {
                write!(f, "Too many records: {} (max {})", count, max)
            }
            Self::EmptyName => write!(f, "Name cannot be empty"),
            Self::EmptyTreeName => write!(f, "Tree name cannot be empty"),
        }
    }
}

impl std::error::Error for LimitError {}

/// Validate a person name
pub fn validate_person_name(name: &str) -> Result<(), LimitError> {
    if name.trim().is_empty() {
        return Err(LimitError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(LimitError::NameTooLong {
            len: name.chars().count(),
            max: MAX_NAME_LEN,
        });
    }
    Ok(())
}

/// Validate a free-text field
pub fn validate_free_text(field: &'static str, text: &str) -> Result<(), LimitError> {
    let len = text.chars().count();
    if len > MAX_TEXT_LEN {
        return Err(LimitError::TextTooLong {
            field,
            len,
            max: MAX_TEXT_LEN,
        });
    }
    Ok(())
}

/// Validate a tree name length
pub fn validate_tree_name(name: &str) -> Result<(), LimitError> {
    if name.is_empty() {
        return Err(LimitError::EmptyTreeName);
    }
    if name.len() > MAX_TREE_NAME_LEN {
        return Err(LimitError::TreeNameTooLong {
            len: name.len(),
            max: MAX_TREE_NAME_LEN,
        });
    }
    Ok(())
}

/// Validate the number of records in one import
pub fn validate_import_size(count: usize) -> Result<(), LimitError> {
    if count > MAX_IMPORT_RECORDS {
        return Err(LimitError::TooManyRecords {
            count,
            max: MAX_IMPORT_RECORDS,
        });
    }
    Ok(())
}
