//! Error types for snmp-rows.
//!
//! Two layers exist. Protocol outcomes of a SET are coded as [`ErrorStatus`]
//! (RFC 3416 error-status values) and travel back to the manager inside the
//! response. Library failures that are not protocol outcomes (bad OID
//! strings, malformed instance identifiers, duplicate keys) are reported as
//! [`Error`].
//!

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// OID validation error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OidErrorKind {
    /// Empty OID string.
    Empty,
    /// Invalid arc value.
    InvalidArc,
    /// OID has too many arcs (exceeds MAX_OID_LEN).
    TooManyArcs { count: usize, max: usize },
}

impl std::fmt::Display for OidErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty OID"),
            Self::InvalidArc => write!(f, "invalid arc value"),
            Self::TooManyArcs { count, max } => {
                write!(f, "OID has {} arcs, exceeds maximum {}", count, max)
            }
        }
    }
}

/// Instance identifier (table index) decode error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexErrorKind {
    /// Index ended before all key fields were read.
    Truncated,
    /// A length sub-identifier claims more arcs than remain.
    LengthExceedsRemaining { declared: u32, remaining: usize },
    /// A sub-identifier of an octet-string field is above 255.
    ByteOutOfRange { arc: u32 },
    /// Arcs left over after the last key field.
    TrailingArcs { count: usize },
    /// A typed key field has a value outside its enumeration.
    ValueOutOfRange { value: u32 },
}

impl std::fmt::Display for IndexErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Truncated => write!(f, "index truncated"),
            Self::LengthExceedsRemaining {
                declared,
                remaining,
            } => write!(
                f,
                "declared length {} exceeds {} remaining sub-identifiers",
                declared, remaining
            ),
            Self::ByteOutOfRange { arc } => {
                write!(f, "octet-string sub-identifier {} exceeds 255", arc)
            }
            Self::TrailingArcs { count } => {
                write!(f, "{} sub-identifiers left after last index field", count)
            }
            Self::ValueOutOfRange { value } => write!(f, "index value {} out of range", value),
        }
    }
}

/// SNMP error status codes (RFC 3416).
///
/// A SET handled by this crate only ever produces the SNMPv2 codes; the
/// SNMPv1 ones exist so a response can be mapped by the agent's codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorStatus {
    NoError,
    TooBig,
    NoSuchName,
    BadValue,
    ReadOnly,
    GenErr,
    NoAccess,
    WrongType,
    WrongLength,
    WrongEncoding,
    WrongValue,
    NoCreation,
    InconsistentValue,
    ResourceUnavailable,
    CommitFailed,
    UndoFailed,
    AuthorizationError,
    NotWritable,
    InconsistentName,
    /// Code outside the RFC 3416 range.
    Unknown(i32),
}

/// Status and SMI name, indexed by the RFC 3416 code.
const STATUS_CODES: [(ErrorStatus, &str); 19] = [
    (ErrorStatus::NoError, "noError"),
    (ErrorStatus::TooBig, "tooBig"),
    (ErrorStatus::NoSuchName, "noSuchName"),
    (ErrorStatus::BadValue, "badValue"),
    (ErrorStatus::ReadOnly, "readOnly"),
    (ErrorStatus::GenErr, "genErr"),
    (ErrorStatus::NoAccess, "noAccess"),
    (ErrorStatus::WrongType, "wrongType"),
    (ErrorStatus::WrongLength, "wrongLength"),
    (ErrorStatus::WrongEncoding, "wrongEncoding"),
    (ErrorStatus::WrongValue, "wrongValue"),
    (ErrorStatus::NoCreation, "noCreation"),
    (ErrorStatus::InconsistentValue, "inconsistentValue"),
    (ErrorStatus::ResourceUnavailable, "resourceUnavailable"),
    (ErrorStatus::CommitFailed, "commitFailed"),
    (ErrorStatus::UndoFailed, "undoFailed"),
    (ErrorStatus::AuthorizationError, "authorizationError"),
    (ErrorStatus::NotWritable, "notWritable"),
    (ErrorStatus::InconsistentName, "inconsistentName"),
];

impl ErrorStatus {
    pub fn from_i32(value: i32) -> Self {
        usize::try_from(value)
            .ok()
            .and_then(|code| STATUS_CODES.get(code))
            .map_or(Self::Unknown(value), |(status, _)| *status)
    }

    pub fn as_i32(&self) -> i32 {
        match self {
            Self::Unknown(code) => *code,
            known => STATUS_CODES
                .iter()
                .position(|(status, _)| status == known)
                .map_or(-1, |code| code as i32),
        }
    }
}

impl std::fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = STATUS_CODES
            .iter()
            .find(|(status, _)| status == self)
            .map(|(_, name)| *name);
        match (self, name) {
            (_, Some(name)) => f.write_str(name),
            (Self::Unknown(code), None) => write!(f, "unknown({code})"),
            (_, None) => write!(f, "unknown({})", self.as_i32()),
        }
    }
}

/// Library error type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// SET rejected; carries the status and 1-based varbind index of the response.
    #[error("SET failed: {status} at index {index}")]
    Snmp {
        status: ErrorStatus,
        index: u32,
        oid: Option<crate::oid::Oid>,
    },

    /// Invalid OID format.
    #[error("invalid OID: {kind}")]
    InvalidOid {
        kind: OidErrorKind,
        input: Option<Box<str>>, // Only allocated when parsing string input
    },

    /// Instance identifier does not decode to a key of the table.
    #[error("invalid index at sub-identifier {offset}: {kind}")]
    InvalidIndex { offset: usize, kind: IndexErrorKind },

    /// A row with the same key already exists.
    #[error("duplicate key in {table}")]
    DuplicateKey { table: &'static str },
}

impl Error {
    /// Create an invalid OID error from a kind (no input string).
    pub fn invalid_oid(kind: OidErrorKind) -> Self {
        Self::InvalidOid { kind, input: None }
    }

    /// Create an invalid OID error with the input string that failed.
    pub fn invalid_oid_with_input(kind: OidErrorKind, input: impl Into<Box<str>>) -> Self {
        Self::InvalidOid {
            kind,
            input: Some(input.into()),
        }
    }

    /// Create an index decode error.
    pub fn invalid_index(offset: usize, kind: IndexErrorKind) -> Self {
        Self::InvalidIndex { offset, kind }
    }

    /// The SNMP error status a manager sees for this error.
    ///
    /// Index errors surface as `inconsistentName`; a duplicate key can only
    /// arise from a broken phase sequence and is reported as `genErr`.
    pub fn error_status(&self) -> ErrorStatus {
        match self {
            Self::Snmp { status, .. } => *status,
            Self::InvalidIndex { .. } => ErrorStatus::InconsistentName,
            Self::InvalidOid { .. } => ErrorStatus::NoSuchName,
            Self::DuplicateKey { .. } => ErrorStatus::GenErr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_roundtrip_codes() {
        for code in 0..=18 {
            assert_eq!(ErrorStatus::from_i32(code).as_i32(), code);
        }
        assert_eq!(ErrorStatus::from_i32(99), ErrorStatus::Unknown(99));
    }

    #[test]
    fn test_error_status_display() {
        assert_eq!(ErrorStatus::InconsistentName.to_string(), "inconsistentName");
        assert_eq!(ErrorStatus::WrongValue.to_string(), "wrongValue");
        assert_eq!(ErrorStatus::Unknown(42).to_string(), "unknown(42)");
    }

    #[test]
    fn test_index_error_maps_to_inconsistent_name() {
        let err = Error::invalid_index(3, IndexErrorKind::ByteOutOfRange { arc: 300 });
        assert_eq!(err.error_status(), ErrorStatus::InconsistentName);
        assert_eq!(
            err.to_string(),
            "invalid index at sub-identifier 3: octet-string sub-identifier 300 exceeds 255"
        );
    }
}
