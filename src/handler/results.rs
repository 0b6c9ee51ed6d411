//! Phase outcomes and PDU responses.

use crate::error::ErrorStatus;
use crate::oid::Oid;
use crate::value::Value;
use crate::varbind::VarBind;

/// Outcome of one SET phase for one varbind.
///
/// The first non-`Ok` result at RESERVE1, RESERVE2 or ACTION aborts the
/// PDU. Each failure variant becomes the RFC 3416 error status of the same
/// name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetResult {
    Ok,
    /// The OID is not under any managed table.
    NoSuchName,
    /// A key-change column reserved for the row's own user was written by
    /// someone else.
    NoAccess,
    /// Column is read-only or not-accessible.
    NotWritable,
    WrongType,
    WrongLength,
    /// Value outside the column's enumeration or range, or a write to a
    /// read-only row.
    WrongValue,
    /// The row cannot be created with this index, or the column is unknown.
    NoCreation,
    /// Value is inconsistent with the row's current state.
    InconsistentValue,
    /// Index does not decode, or names a row that does not exist.
    InconsistentName,
    /// The table is at its row limit.
    ResourceUnavailable,
    /// A pre-image could not be restored.
    UndoFailed,
    /// Phase contract violated.
    GenErr,
}

impl SetResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, SetResult::Ok)
    }

    pub fn to_error_status(&self) -> ErrorStatus {
        match self {
            SetResult::Ok => ErrorStatus::NoError,
            SetResult::NoSuchName => ErrorStatus::NoSuchName,
            SetResult::NoAccess => ErrorStatus::NoAccess,
            SetResult::NotWritable => ErrorStatus::NotWritable,
            SetResult::WrongType => ErrorStatus::WrongType,
            SetResult::WrongLength => ErrorStatus::WrongLength,
            SetResult::WrongValue => ErrorStatus::WrongValue,
            SetResult::NoCreation => ErrorStatus::NoCreation,
            SetResult::InconsistentValue => ErrorStatus::InconsistentValue,
            SetResult::InconsistentName => ErrorStatus::InconsistentName,
            SetResult::ResourceUnavailable => ErrorStatus::ResourceUnavailable,
            SetResult::UndoFailed => ErrorStatus::UndoFailed,
            SetResult::GenErr => ErrorStatus::GenErr,
        }
    }
}

/// Response to a SET PDU.
///
/// Built by [`SetTransaction`](crate::agent::SetTransaction). The varbinds
/// echo the request whether or not it succeeded.
#[derive(Debug, Clone)]
pub struct Response {
    pub varbinds: Vec<VarBind>,
    pub error_status: ErrorStatus,
    /// 1-based index of the failing varbind, 0 on success.
    pub error_index: i32,
}

impl Response {
    pub fn success(varbinds: Vec<VarBind>) -> Self {
        Self {
            varbinds,
            error_status: ErrorStatus::NoError,
            error_index: 0,
        }
    }

    pub fn error(error_status: ErrorStatus, error_index: i32, varbinds: Vec<VarBind>) -> Self {
        Self {
            varbinds,
            error_status,
            error_index,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error_status == ErrorStatus::NoError
    }

    /// OID of the varbind named by `error_index`, if any.
    pub fn failed_oid(&self) -> Option<&Oid> {
        let index = usize::try_from(self.error_index).ok()?.checked_sub(1)?;
        self.varbinds.get(index).map(|vb| &vb.oid)
    }
}

/// Result of reading one instance.
#[derive(Debug, Clone, PartialEq)]
pub enum GetResult {
    Value(Value),
    /// The OID is not under a table, or names an unknown or not-accessible
    /// column.
    NoSuchObject,
    /// The column exists but no visible row has this index.
    NoSuchInstance,
}

impl GetResult {
    pub fn into_value(self) -> Option<Value> {
        match self {
            GetResult::Value(v) => Some(v),
            _ => None,
        }
    }
}

/// Result of a GETNEXT step.
#[derive(Debug, Clone, PartialEq)]
pub enum GetNextResult {
    /// The next readable instance in lexicographic order.
    Value(VarBind),
    EndOfMibView,
}

impl GetNextResult {
    pub fn is_end_of_mib_view(&self) -> bool {
        matches!(self, GetNextResult::EndOfMibView)
    }

    pub fn into_option(self) -> Option<VarBind> {
        match self {
            GetNextResult::Value(vb) => Some(vb),
            GetNextResult::EndOfMibView => None,
        }
    }
}
