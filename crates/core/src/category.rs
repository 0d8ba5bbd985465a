//! Track categories.
//!
//! The set is closed: anything outside it is rejected at the edge rather than
//! stored. Serialized names match the labels clients send (`"Hip-hop"`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    Rock,
    Pop,
    Jazz,
    Classical,
    #[serde(rename = "Hip-hop")]
    HipHop,
    Electronic,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Rock,
        Category::Pop,
        Category::Jazz,
        Category::Classical,
        Category::HipHop,
        Category::Electronic,
        Category::Other,
    ];

    /// Stored and wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rock => "Rock",
            Self::Pop => "Pop",
            Self::Jazz => "Jazz",
            Self::Classical => "Classical",
            Self::HipHop => "Hip-hop",
            Self::Electronic => "Electronic",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    /// Exact match on the label; the match is case-sensitive like every other
    /// equality filter in the catalog.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                let labels: Vec<&str> = Self::ALL.iter().map(|c| c.as_str()).collect();
                CoreError::Validation(format!(
                    "Invalid category '{s}'. Must be one of: {}",
                    labels.join(", ")
                ))
            })
    }
}

impl TryFrom<String> for Category {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
