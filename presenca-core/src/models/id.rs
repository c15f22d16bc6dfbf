use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Identifier assigned by the remote collaborator.
///
/// The API hands out both numeric ids (`7`) and string ids (`"registro_12"`),
/// and callers may hold either form for the same entity. Equality and hashing
/// therefore go through the string form: `Number(1) == Text("1")`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl EntityId {
    /// Returns true if this id's string form equals `other`.
    pub fn matches(&self, other: &str) -> bool {
        match self {
            EntityId::Number(n) => n.to_string() == other,
            EntityId::Text(s) => s == other,
        }
    }
}

impl PartialEq for EntityId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (EntityId::Number(a), EntityId::Number(b)) => a == b,
            (EntityId::Text(a), EntityId::Text(b)) => a == b,
            (EntityId::Number(_), EntityId::Text(s)) => self.matches(s),
            (EntityId::Text(s), EntityId::Number(_)) => other.matches(s),
        }
    }
}

impl Eq for EntityId {}

impl Hash for EntityId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{}", n),
            EntityId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.into())
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        EntityId::Number(n)
    }
}

impl From<&str> for EntityId {
    /// Integer text becomes a numeric id, anything else stays text.
    fn from(s: &str) -> Self {
        let trimmed = s.trim();
        // "007" must keep its leading zeros, so only canonical integers convert.
        match trimmed.parse::<i64>() {
            Ok(n) if n.to_string() == trimmed => EntityId::Number(n),
            _ => EntityId::Text(trimmed.to_string()),
        }
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        EntityId::from(s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_number_equals_matching_text() {
        assert_eq!(EntityId::Number(1), EntityId::Text("1".to_string()));
        assert_eq!(EntityId::Text("42".to_string()), EntityId::Number(42));
        assert_ne!(EntityId::Number(1), EntityId::Text("01".to_string()));
    }

    #[test]
    fn test_hash_follows_string_form() {
        let mut set = HashSet::new();
        set.insert(EntityId::Number(3));
        assert!(set.contains(&EntityId::Text("3".to_string())));
    }

    #[test]
    fn test_from_str() {
        assert!(matches!(EntityId::from("12"), EntityId::Number(12)));
        assert!(matches!(EntityId::from("007"), EntityId::Text(_)));
        assert!(matches!(EntityId::from("aluno_1_0"), EntityId::Text(_)));
    }

    #[test]
    fn test_json_accepts_both_forms() {
        let n: EntityId = serde_json::from_str("5").unwrap();
        let s: EntityId = serde_json::from_str("\"registro_9\"").unwrap();
        assert!(matches!(n, EntityId::Number(5)));
        assert_eq!(s.to_string(), "registro_9");
        assert_eq!(serde_json::to_string(&n).unwrap(), "5");
    }

    #[test]
    fn test_matches() {
        assert!(EntityId::Number(7).matches("7"));
        assert!(!EntityId::Text("a".to_string()).matches("b"));
    }
}
