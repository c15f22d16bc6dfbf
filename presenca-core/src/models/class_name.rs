use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::collation;

/// The fixed set of classes (turmas) shown to users, in declaration order.
///
/// Raw data may mention other class names; those are kept in the caches but
/// never listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClassName {
    #[serde(rename = "Berçário")]
    Bercario,
    Maternal,
    Principiantes,
    Juniores,
    #[serde(rename = "Intermediários")]
    Intermediarios,
    Jovens,
    Adultos,
}

impl ClassName {
    /// All permitted classes in declaration order.
    pub const ALL: [ClassName; 7] = [
        ClassName::Bercario,
        ClassName::Maternal,
        ClassName::Principiantes,
        ClassName::Juniores,
        ClassName::Intermediarios,
        ClassName::Jovens,
        ClassName::Adultos,
    ];

    /// The name as stored in records and roster keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassName::Bercario => "Berçário",
            ClassName::Maternal => "Maternal",
            ClassName::Principiantes => "Principiantes",
            ClassName::Juniores => "Juniores",
            ClassName::Intermediarios => "Intermediários",
            ClassName::Jovens => "Jovens",
            ClassName::Adultos => "Adultos",
        }
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ClassName {
    type Err = String;

    /// Accepts the stored name in any case, with or without accents.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = collation::fold(s.trim());
        ClassName::ALL
            .into_iter()
            .find(|c| collation::fold(c.as_str()) == folded)
            .ok_or_else(|| {
                let names: Vec<&str> = ClassName::ALL.iter().map(|c| c.as_str()).collect();
                format!(
                    "Invalid class '{}'. Valid options: {}",
                    s,
                    names.join(", ")
                )
            })
    }
}
