//! Record kinds tracked by the backlog

use crate::error::BacklogError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two record kinds that can carry pending changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Scene,
    Performer,
}

impl RecordKind {
    /// Singular name, used in object cache keys (`scene/<id>`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scene => "scene",
            Self::Performer => "performer",
        }
    }

    /// Plural name, used for manifest sections and remote directories
    pub fn plural(&self) -> &'static str {
        match self {
            Self::Scene => "scenes",
            Self::Performer => "performers",
        }
    }

    /// All kinds in display order
    pub fn all() -> &'static [Self] {
        &[Self::Scene, Self::Performer]
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = BacklogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "scene" | "scenes" => Ok(Self::Scene),
            "performer" | "performers" => Ok(Self::Performer),
            other => Err(BacklogError::InvalidRecordKind(other.to_string())),
        }
    }
}
