use serde::{Deserialize, Serialize};

/// Sentinel the app stores when a session had no visitors.
pub const NO_VISITORS: &str = "-";

/// Presence (or absence) as it may arrive from the remote or older snapshots.
///
/// Older records stored a plain count, some stored the list of names, and
/// some stored the names as one comma-separated string. This type exists only
/// at the ingestion boundary; records are normalised to a count on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PresenceField {
    Count(u32),
    Names(Vec<String>),
    Text(String),
}

impl PresenceField {
    /// Number of people this field stands for.
    pub fn count(&self) -> u32 {
        match self {
            PresenceField::Count(n) => *n,
            PresenceField::Names(names) => names.len() as u32,
            PresenceField::Text(text) => split_names(text).len() as u32,
        }
    }

    /// The explicit names, when the field carried any.
    pub fn names(&self) -> Option<Vec<String>> {
        match self {
            PresenceField::Count(_) => None,
            PresenceField::Names(names) => Some(names.clone()),
            PresenceField::Text(text) => Some(split_names(text)),
        }
    }
}

impl Default for PresenceField {
    fn default() -> Self {
        PresenceField::Count(0)
    }
}

/// Splits a comma-separated list, trimming each token and dropping empties.
pub fn split_names(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Visitor names from a stored visitor field. Empty or `"-"` means none.
pub fn visitor_names(field: &str) -> Vec<String> {
    let trimmed = field.trim();
    if trimmed.is_empty() || trimmed == NO_VISITORS {
        return Vec::new();
    }
    split_names(trimmed)
}

/// Normalises user-entered visitors for storage: blank becomes `"-"`.
pub fn normalize_visitors(field: &str) -> String {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        NO_VISITORS.to_string()
    } else {
        trimmed.to_string()
    }
}
