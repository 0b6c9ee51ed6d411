//! Instance identifier (table index) codec.
//!
//! A conceptual row is addressed by appending its key fields to the column
//! OID. Encoding per field follows RFC 2578 Section 7.7:
//!
//! - variable-length OCTET STRING: a length sub-identifier followed by one
//!   sub-identifier per byte
//! - INTEGER: a single sub-identifier
//! - OBJECT IDENTIFIER: a length sub-identifier followed by the arcs
//!
//! ```rust
//! use bytes::Bytes;
//! use snmp_rows::index::{self, IndexComponent, IndexKind};
//!
//! let key = [
//!     IndexComponent::Integer(3),
//!     IndexComponent::OctetString(Bytes::from_static(b"bob")),
//! ];
//! let suffix = index::encode(&key);
//! assert_eq!(suffix.arcs(), &[3, 3, 98, 111, 98]);
//!
//! let kinds = [IndexKind::Integer, IndexKind::OctetString];
//! let decoded = index::decode(&kinds, suffix.arcs()).unwrap();
//! assert_eq!(decoded, key);
//! ```

use std::fmt;

use bytes::Bytes;

use crate::error::{Error, IndexErrorKind, Result};
use crate::oid::Oid;

/// Declared type of one key field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Fixed-size integer, one sub-identifier.
    Integer,
    /// Variable-length octet string, length-prefixed.
    OctetString,
    /// Variable-length object identifier, length-prefixed.
    ObjectIdentifier,
}

/// One decoded key field.
///
/// The derived ordering compares like-typed fields the way the tables order
/// their rows: integers numerically, octet strings byte-wise, OIDs
/// arc-by-arc. A sequence of components that is a strict prefix of another
/// sorts before it, which is how an absent trailing field compares.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndexComponent {
    Integer(u32),
    OctetString(Bytes),
    ObjectIdentifier(Oid),
}

impl IndexComponent {
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::OctetString(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_oid(&self) -> Option<&Oid> {
        match self {
            Self::ObjectIdentifier(o) => Some(o),
            _ => None,
        }
    }
}

/// Encode key fields to an OID suffix.
pub fn encode(components: &[IndexComponent]) -> Oid {
    let mut arcs: Vec<u32> = Vec::with_capacity(16);
    for component in components {
        match component {
            IndexComponent::Integer(v) => arcs.push(*v),
            IndexComponent::OctetString(bytes) => {
                arcs.push(bytes.len() as u32);
                arcs.extend(bytes.iter().map(|&b| u32::from(b)));
            }
            IndexComponent::ObjectIdentifier(oid) => {
                arcs.push(oid.len() as u32);
                arcs.extend_from_slice(oid.arcs());
            }
        }
    }
    Oid::from_slice(&arcs)
}

/// Decode a complete OID suffix against `schema`.
///
/// Every field must be present and every sub-identifier consumed.
pub fn decode(schema: &[IndexKind], arcs: &[u32]) -> Result<Vec<IndexComponent>> {
    let mut cursor = Cursor { arcs, pos: 0 };
    let mut out = Vec::with_capacity(schema.len());

    for kind in schema {
        if cursor.remaining() == 0 {
            return Err(Error::invalid_index(cursor.pos, IndexErrorKind::Truncated));
        }
        let component = match kind {
            IndexKind::Integer => IndexComponent::Integer(cursor.next_arc()),
            IndexKind::OctetString => {
                let len = cursor.read_length()?;
                IndexComponent::OctetString(cursor.read_bytes(len)?)
            }
            IndexKind::ObjectIdentifier => {
                let len = cursor.read_length()?;
                IndexComponent::ObjectIdentifier(cursor.read_oid(len))
            }
        };
        out.push(component);
    }

    if cursor.remaining() != 0 {
        return Err(Error::invalid_index(
            cursor.pos,
            IndexErrorKind::TrailingArcs {
                count: cursor.remaining(),
            },
        ));
    }

    Ok(out)
}

/// Decode a possibly incomplete OID suffix, as supplied to GETNEXT.
///
/// Decoding stops at the end of the input: missing trailing fields are
/// simply absent, and a length-prefixed field cut short keeps the
/// sub-identifiers that are present. Arcs after the last field are ignored.
/// An octet-string sub-identifier above 255 is still rejected.
pub fn decode_partial(schema: &[IndexKind], arcs: &[u32]) -> Result<Vec<IndexComponent>> {
    let mut cursor = Cursor { arcs, pos: 0 };
    let mut out = Vec::with_capacity(schema.len());

    for kind in schema {
        if cursor.remaining() == 0 {
            break;
        }
        let component = match kind {
            IndexKind::Integer => IndexComponent::Integer(cursor.next_arc()),
            IndexKind::OctetString => {
                let len = cursor.next_arc() as usize;
                let take = len.min(cursor.remaining());
                IndexComponent::OctetString(cursor.read_bytes(take)?)
            }
            IndexKind::ObjectIdentifier => {
                let len = cursor.next_arc() as usize;
                let take = len.min(cursor.remaining());
                IndexComponent::ObjectIdentifier(cursor.read_oid(take))
            }
        };
        out.push(component);
    }

    Ok(out)
}

struct Cursor<'a> {
    arcs: &'a [u32],
    pos: usize,
}

impl Cursor<'_> {
    fn remaining(&self) -> usize {
        self.arcs.len() - self.pos
    }

    fn next_arc(&mut self) -> u32 {
        let arc = self.arcs[self.pos];
        self.pos += 1;
        arc
    }

    fn read_length(&mut self) -> Result<usize> {
        let declared = self.next_arc();
        if declared as usize > self.remaining() {
            return Err(Error::invalid_index(
                self.pos - 1,
                IndexErrorKind::LengthExceedsRemaining {
                    declared,
                    remaining: self.remaining(),
                },
            ));
        }
        Ok(declared as usize)
    }

    fn read_bytes(&mut self, len: usize) -> Result<Bytes> {
        let mut bytes = Vec::with_capacity(len);
        for _ in 0..len {
            let offset = self.pos;
            let arc = self.next_arc();
            let byte = u8::try_from(arc)
                .map_err(|_| Error::invalid_index(offset, IndexErrorKind::ByteOutOfRange { arc }))?;
            bytes.push(byte);
        }
        Ok(Bytes::from(bytes))
    }

    fn read_oid(&mut self, len: usize) -> Oid {
        let oid = Oid::from_slice(&self.arcs[self.pos..self.pos + len]);
        self.pos += len;
        oid
    }
}

/// Key of a conceptual row.
///
/// Implementors must order themselves exactly like their
/// [`components`](RowKey::components) do; deriving `Ord` over fields
/// declared in index order satisfies this.
pub trait RowKey: Clone + Ord + fmt::Debug + Send + Sync + 'static {
    /// Field types, in index order.
    const SCHEMA: &'static [IndexKind];

    /// Key fields, in index order.
    fn components(&self) -> Vec<IndexComponent>;

    /// Build a key from decoded fields.
    ///
    /// `components` always matches [`SCHEMA`](RowKey::SCHEMA) in length and
    /// field types; implementations check value ranges only.
    fn from_components(
        components: Vec<IndexComponent>,
    ) -> std::result::Result<Self, IndexErrorKind>;

    /// Encode to an OID suffix.
    fn to_index(&self) -> Oid {
        encode(&self.components())
    }

    /// Decode from a complete OID suffix.
    fn from_index(arcs: &[u32]) -> Result<Self> {
        let components = decode(Self::SCHEMA, arcs)?;
        Self::from_components(components).map_err(|kind| Error::invalid_index(0, kind))
    }
}

/// Take an octet-string field out of a decoded component list.
///
/// Helper for [`RowKey::from_components`] implementations.
pub(crate) fn take_bytes(
    components: &mut std::vec::IntoIter<IndexComponent>,
) -> std::result::Result<Bytes, IndexErrorKind> {
    match components.next() {
        Some(IndexComponent::OctetString(b)) => Ok(b),
        _ => Err(IndexErrorKind::Truncated),
    }
}

/// Take an integer field out of a decoded component list.
pub(crate) fn take_u32(
    components: &mut std::vec::IntoIter<IndexComponent>,
) -> std::result::Result<u32, IndexErrorKind> {
    match components.next() {
        Some(IndexComponent::Integer(v)) => Ok(v),
        _ => Err(IndexErrorKind::Truncated),
    }
}

/// Take an OID field out of a decoded component list.
pub(crate) fn take_oid(
    components: &mut std::vec::IntoIter<IndexComponent>,
) -> std::result::Result<Oid, IndexErrorKind> {
    match components.next() {
        Some(IndexComponent::ObjectIdentifier(o)) => Ok(o),
        _ => Err(IndexErrorKind::Truncated),
    }
}
