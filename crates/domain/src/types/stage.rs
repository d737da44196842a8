//! Deployment stage

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_STAGE, DEV_STAGE};

/// Deployment environment tag.
///
/// Only `dev` changes behavior (it turns on the local-part suffix rule);
/// every other tag is carried through verbatim for logging.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Stage {
    Dev,
    Other(String),
}

impl Stage {
    /// Whether the development-only validation rules apply.
    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Dev => DEV_STAGE,
            Self::Other(tag) => tag,
        }
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::Other(DEFAULT_STAGE.to_string())
    }
}

impl From<String> for Stage {
    fn from(value: String) -> Self {
        // Exact match, as the deployment tooling sets the tag verbatim.
        if value == DEV_STAGE {
            Self::Dev
        } else if value.is_empty() {
            Self::default()
        } else {
            Self::Other(value)
        }
    }
}

impl From<&str> for Stage {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Stage> for String {
    fn from(stage: Stage) -> Self {
        stage.as_str().to_string()
    }
}

impl FromStr for Stage {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
