//! View-based Access Control Model tables (RFC 3415).
//!
//! VACM configuration lives in three tables, all of them
//! dynamically-creatable through RowStatus:
//!
//! 1. **Security-to-Group Table** ([`GroupEntry`]): maps (securityModel,
//!    securityName) to a group name.
//!
//! 2. **Access Table** ([`AccessEntry`]): maps (groupName, contextPrefix,
//!    securityModel, securityLevel) to view names for read, write and
//!    notify operations.
//!
//! 3. **View Tree Family Table** ([`ViewEntry`]): defines views as families
//!    of OID subtrees, with inclusion/exclusion and wildcard masks.
//!
//! This module manages the rows. Deciding whether a request may access an
//! OID is left to the caller.
//!
//! # Example
//!
//! Seed a read-only group through the agent builder:
//!
//! ```rust
//! use snmp_rows::agent::MibTables;
//! use snmp_rows::vacm::SecurityModel;
//! use snmp_rows::oid;
//!
//! let tables = MibTables::builder()
//!     .group("public", SecurityModel::V2c, "readers")
//!     .access("readers", |a| a.read_view("system_view"))
//!     .view("system_view", |v| v.include(oid!(1, 3, 6, 1, 2, 1, 1)))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(tables.groups().len(), 1);
//! assert_eq!(tables.views().len(), 1);
//! ```

mod access;
mod group;
mod view;

use std::fmt;

pub use access::{AccessEntry, AccessEntryBuilder, AccessKey};
pub use group::{GroupEntry, GroupKey};
pub use view::{ViewBuilder, ViewEntry, ViewKey};

/// Security model identifiers (RFC 3411).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SecurityModel {
    /// Wildcard, only meaningful in the access table.
    Any = 0,
    /// SNMPv1.
    V1 = 1,
    /// SNMPv2c.
    V2c = 2,
    /// SNMPv3 User-based Security Model.
    Usm = 3,
}

impl SecurityModel {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Any),
            1 => Some(Self::V1),
            2 => Some(Self::V2c),
            3 => Some(Self::Usm),
            _ => None,
        }
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for SecurityModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::V1 => write!(f, "SNMPv1"),
            Self::V2c => write!(f, "SNMPv2c"),
            Self::Usm => write!(f, "USM"),
        }
    }
}

/// Message security level (RFC 3411 SnmpSecurityLevel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SecurityLevel {
    #[default]
    NoAuthNoPriv = 1,
    AuthNoPriv = 2,
    AuthPriv = 3,
}

impl SecurityLevel {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            1 => Some(Self::NoAuthNoPriv),
            2 => Some(Self::AuthNoPriv),
            3 => Some(Self::AuthPriv),
            _ => None,
        }
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAuthNoPriv => write!(f, "noAuthNoPriv"),
            Self::AuthNoPriv => write!(f, "authNoPriv"),
            Self::AuthPriv => write!(f, "authPriv"),
        }
    }
}

/// Context matching mode for access entries (vacmAccessContextMatch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContextMatch {
    /// Exact context name match.
    #[default]
    Exact = 1,
    /// Context name prefix match.
    Prefix = 2,
}

impl ContextMatch {
    pub const VALUES: &'static [i32] = &[1, 2];

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::Exact),
            2 => Some(Self::Prefix),
            _ => None,
        }
    }
}

/// Whether a view subtree family is part of the view (vacmViewTreeFamilyType).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ViewType {
    #[default]
    Included = 1,
    Excluded = 2,
}

impl ViewType {
    pub const VALUES: &'static [i32] = &[1, 2];

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::Included),
            2 => Some(Self::Excluded),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_security_model_codes() {
        for code in 0..=3 {
            assert_eq!(SecurityModel::from_u32(code).map(|m| m.as_u32()), Some(code));
        }
        assert_eq!(SecurityModel::from_u32(4), None);
        assert!(SecurityModel::V1 < SecurityModel::V2c);
    }

    #[test]
    fn test_security_level_ordering() {
        assert!(SecurityLevel::NoAuthNoPriv < SecurityLevel::AuthNoPriv);
        assert!(SecurityLevel::AuthNoPriv < SecurityLevel::AuthPriv);
        assert_eq!(SecurityLevel::from_u32(0), None);
        assert_eq!(SecurityLevel::from_u32(4), None);
        assert_eq!(SecurityLevel::AuthPriv.to_string(), "authPriv");
    }

    #[test]
    fn test_enumerations() {
        assert_eq!(ContextMatch::from_i32(2), Some(ContextMatch::Prefix));
        assert_eq!(ContextMatch::from_i32(3), None);
        assert_eq!(ViewType::from_i32(1), Some(ViewType::Included));
        assert_eq!(ViewType::default(), ViewType::Included);
    }
}
