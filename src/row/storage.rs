//! StorageType textual convention (RFC 2579).

use std::fmt;

use crate::handler::SetResult;

/// How a row survives a restart, and how far it may be changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StorageType {
    Other = 1,
    Volatile = 2,
    #[default]
    NonVolatile = 3,
    /// Columns may change, the row may not be destroyed.
    Permanent = 4,
    /// Nothing about the row may change.
    ReadOnly = 5,
}

impl StorageType {
    pub const VALUES: &'static [i32] = &[1, 2, 3, 4, 5];

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::Other),
            2 => Some(Self::Volatile),
            3 => Some(Self::NonVolatile),
            4 => Some(Self::Permanent),
            5 => Some(Self::ReadOnly),
            _ => None,
        }
    }

    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_deletable(self) -> bool {
        !matches!(self, Self::Permanent | Self::ReadOnly)
    }

    /// Generic conversion rule: volatile and nonVolatile convert into each
    /// other, any other change is `inconsistentValue`.
    pub fn check_transition(self, to: StorageType) -> SetResult {
        use StorageType::*;

        match (self, to) {
            (from, to) if from == to => SetResult::Ok,
            (Volatile, NonVolatile) | (NonVolatile, Volatile) => SetResult::Ok,
            _ => SetResult::InconsistentValue,
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other => write!(f, "other"),
            Self::Volatile => write!(f, "volatile"),
            Self::NonVolatile => write!(f, "nonVolatile"),
            Self::Permanent => write!(f, "permanent"),
            Self::ReadOnly => write!(f, "readOnly"),
        }
    }
}
