//! User-based Security Model user table (RFC 3414).
//!
//! [`UserEntry`] rows hold the per-user protocols and localized keys. A
//! manager creates a user by cloning an existing one (usmUserCloneFrom),
//! then rotates its keys with KeyChange values (see [`key_change`]).
//!
//! Message authentication and encryption are not performed here; the keys
//! are stored for the security subsystem that does.

pub mod key_change;
mod user;

use std::fmt;

use crate::oid::Oid;

pub use key_change::{KeyChangeError, SecretKey, decode_keychange, encode_keychange};
pub use user::{UserBuilder, UserEntry, UserKey};

/// usmNoAuthProtocol, 1.3.6.1.6.3.10.1.1.1
pub const USM_NO_AUTH_PROTOCOL: &[u32] = &[1, 3, 6, 1, 6, 3, 10, 1, 1, 1];

/// usmNoPrivProtocol, 1.3.6.1.6.3.10.1.2.1
pub const USM_NO_PRIV_PROTOCOL: &[u32] = &[1, 3, 6, 1, 6, 3, 10, 1, 2, 1];

const AUTH_PROTOCOLS: &[u32] = &[1, 3, 6, 1, 6, 3, 10, 1, 1];
const PRIV_PROTOCOLS: &[u32] = &[1, 3, 6, 1, 6, 3, 10, 1, 2];
const CISCO_AES_PROTOCOLS: &[u32] = &[1, 3, 6, 1, 4, 1, 9, 12, 6, 1];

/// Authentication protocols (usmUserAuthProtocol values other than none).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AuthProtocol {
    /// usmHMACMD5AuthProtocol (RFC 3414)
    Md5,
    /// usmHMACSHAAuthProtocol (RFC 3414)
    Sha1,
    /// usmHMAC128SHA224AuthProtocol (RFC 7860)
    Sha224,
    /// usmHMAC192SHA256AuthProtocol (RFC 7860)
    Sha256,
    /// usmHMAC256SHA384AuthProtocol (RFC 7860)
    Sha384,
    /// usmHMAC384SHA512AuthProtocol (RFC 7860)
    Sha512,
}

impl AuthProtocol {
    /// Digest output length in bytes, which is also the localized key length.
    pub fn digest_len(self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha224 => 28,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Protocol identity under snmpAuthProtocols.
    pub fn oid(self) -> Oid {
        let arc = match self {
            Self::Md5 => 2,
            Self::Sha1 => 3,
            Self::Sha224 => 4,
            Self::Sha256 => 5,
            Self::Sha384 => 6,
            Self::Sha512 => 7,
        };
        Oid::from_slice(AUTH_PROTOCOLS).child(arc)
    }

    /// Look up a protocol by its identity. usmNoAuthProtocol is not a
    /// protocol and yields `None`.
    pub fn from_oid(oid: &Oid) -> Option<Self> {
        match oid.arcs().strip_prefix(AUTH_PROTOCOLS)? {
            [2] => Some(Self::Md5),
            [3] => Some(Self::Sha1),
            [4] => Some(Self::Sha224),
            [5] => Some(Self::Sha256),
            [6] => Some(Self::Sha384),
            [7] => Some(Self::Sha512),
            _ => None,
        }
    }
}

impl fmt::Display for AuthProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Md5 => write!(f, "MD5"),
            Self::Sha1 => write!(f, "SHA"),
            Self::Sha224 => write!(f, "SHA-224"),
            Self::Sha256 => write!(f, "SHA-256"),
            Self::Sha384 => write!(f, "SHA-384"),
            Self::Sha512 => write!(f, "SHA-512"),
        }
    }
}

/// Privacy protocols (usmUserPrivProtocol values other than none).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrivProtocol {
    /// usmDESPrivProtocol (RFC 3414)
    Des,
    /// usm3DESEDEPrivProtocol (draft-reeder-snmpv3-usm-3desede-00)
    Des3,
    /// usmAesCfb128Protocol (RFC 3826)
    Aes128,
    /// AES-192-CFB, Cisco identity
    Aes192,
    /// AES-256-CFB, Cisco identity
    Aes256,
}

impl PrivProtocol {
    /// Localized key length in bytes.
    pub fn key_len(self) -> usize {
        match self {
            Self::Des => 16,  // 8 key + 8 pre-IV
            Self::Des3 => 32, // 24 key + 8 pre-IV
            Self::Aes128 => 16,
            Self::Aes192 => 24,
            Self::Aes256 => 32,
        }
    }

    pub fn oid(self) -> Oid {
        match self {
            Self::Des => Oid::from_slice(PRIV_PROTOCOLS).child(2),
            Self::Des3 => Oid::from_slice(PRIV_PROTOCOLS).child(3),
            Self::Aes128 => Oid::from_slice(PRIV_PROTOCOLS).child(4),
            Self::Aes192 => Oid::from_slice(CISCO_AES_PROTOCOLS).child(1),
            Self::Aes256 => Oid::from_slice(CISCO_AES_PROTOCOLS).child(2),
        }
    }

    /// Look up a protocol by its identity. usmNoPrivProtocol yields `None`.
    pub fn from_oid(oid: &Oid) -> Option<Self> {
        let arcs = oid.arcs();
        if let Some(rest) = arcs.strip_prefix(PRIV_PROTOCOLS) {
            return match rest {
                [2] => Some(Self::Des),
                [3] => Some(Self::Des3),
                [4] => Some(Self::Aes128),
                _ => None,
            };
        }
        match arcs.strip_prefix(CISCO_AES_PROTOCOLS)? {
            [1] => Some(Self::Aes192),
            [2] => Some(Self::Aes256),
            _ => None,
        }
    }
}

impl fmt::Display for PrivProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Des => write!(f, "DES"),
            Self::Des3 => write!(f, "3DES"),
            Self::Aes128 => write!(f, "AES"),
            Self::Aes192 => write!(f, "AES-192"),
            Self::Aes256 => write!(f, "AES-256"),
        }
    }
}

/// A usmUserAuthProtocol value, with `None` for usmNoAuthProtocol.
///
/// Returns `Err(())` for identities this agent does not implement.
pub(crate) fn parse_auth_oid(oid: &Oid) -> Result<Option<AuthProtocol>, ()> {
    if oid.arcs() == USM_NO_AUTH_PROTOCOL {
        return Ok(None);
    }
    AuthProtocol::from_oid(oid).map(Some).ok_or(())
}

/// A usmUserPrivProtocol value, with `None` for usmNoPrivProtocol.
pub(crate) fn parse_priv_oid(oid: &Oid) -> Result<Option<PrivProtocol>, ()> {
    if oid.arcs() == USM_NO_PRIV_PROTOCOL {
        return Ok(None);
    }
    PrivProtocol::from_oid(oid).map(Some).ok_or(())
}

pub(crate) fn auth_oid(protocol: Option<AuthProtocol>) -> Oid {
    protocol.map_or_else(|| Oid::from_slice(USM_NO_AUTH_PROTOCOL), AuthProtocol::oid)
}

pub(crate) fn priv_oid(protocol: Option<PrivProtocol>) -> Oid {
    protocol.map_or_else(|| Oid::from_slice(USM_NO_PRIV_PROTOCOL), PrivProtocol::oid)
}
