//! Sort direction keyword.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ordering applied to the sort key of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest key first.
    Asc,
    /// Largest key first.
    Desc,
}

impl SortDirection {
    /// Lowercase keyword used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a sort direction keyword is not `asc` or `desc`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("sort order must be one of [asc, desc], got {value:?}")]
pub struct SortDirectionParseError {
    /// Rejected input.
    pub value: String,
}

impl FromStr for SortDirection {
    type Err = SortDirectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(SortDirectionParseError {
                value: other.to_owned(),
            }),
        }
    }
}
