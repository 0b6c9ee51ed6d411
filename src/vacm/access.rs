//! vacmAccessTable rows.

use bytes::Bytes;

use crate::error::IndexErrorKind;
use crate::handler::SetResult;
use crate::index::{self, IndexComponent, IndexKind, RowKey};
use crate::row::{
    ADMIN_STRING_32, Column, ColumnContext, ColumnSyntax, ConceptualRow, RowStatus, StorageType,
};
use crate::value::Value;

use super::{ContextMatch, SecurityLevel, SecurityModel};

/// vacmAccessEntry, 1.3.6.1.6.3.16.1.4.1
const ENTRY: &[u32] = &[1, 3, 6, 1, 6, 3, 16, 1, 4, 1];

const COL_CONTEXT_PREFIX: u32 = 1;
const COL_SECURITY_MODEL: u32 = 2;
const COL_SECURITY_LEVEL: u32 = 3;
const COL_CONTEXT_MATCH: u32 = 4;
const COL_READ_VIEW: u32 = 5;
const COL_WRITE_VIEW: u32 = 6;
const COL_NOTIFY_VIEW: u32 = 7;
const COL_STORAGE_TYPE: u32 = 8;
const COL_STATUS: u32 = 9;

/// Index of the access table.
///
/// The first field is the group name from vacmSecurityToGroupTable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccessKey {
    pub group_name: Bytes,
    pub context_prefix: Bytes,
    pub security_model: SecurityModel,
    pub security_level: SecurityLevel,
}

impl RowKey for AccessKey {
    const SCHEMA: &'static [IndexKind] = &[
        IndexKind::OctetString,
        IndexKind::OctetString,
        IndexKind::Integer,
        IndexKind::Integer,
    ];

    fn components(&self) -> Vec<IndexComponent> {
        vec![
            IndexComponent::OctetString(self.group_name.clone()),
            IndexComponent::OctetString(self.context_prefix.clone()),
            IndexComponent::Integer(self.security_model.as_u32()),
            IndexComponent::Integer(self.security_level.as_u32()),
        ]
    }

    fn from_components(components: Vec<IndexComponent>) -> Result<Self, IndexErrorKind> {
        let mut fields = components.into_iter();
        let group_name = index::take_bytes(&mut fields)?;
        let context_prefix = index::take_bytes(&mut fields)?;
        let model = index::take_u32(&mut fields)?;
        let security_model = SecurityModel::from_u32(model)
            .ok_or(IndexErrorKind::ValueOutOfRange { value: model })?;
        let level = index::take_u32(&mut fields)?;
        let security_level = SecurityLevel::from_u32(level)
            .ok_or(IndexErrorKind::ValueOutOfRange { value: level })?;

        Ok(Self {
            group_name,
            context_prefix,
            security_model,
            security_level,
        })
    }
}

/// Access rights granted to a group in a context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessEntry {
    key: AccessKey,
    pub context_match: ContextMatch,
    pub read_view: Bytes,
    pub write_view: Bytes,
    pub notify_view: Bytes,
    storage_type: StorageType,
    status: RowStatus,
}

impl ConceptualRow for AccessEntry {
    type Key = AccessKey;

    const TABLE: &'static str = "vacmAccessTable";
    const ENTRY: &'static [u32] = ENTRY;
    const STATUS_COLUMN: u32 = COL_STATUS;
    const STORAGE_TYPE_COLUMN: u32 = COL_STORAGE_TYPE;

    fn new(key: AccessKey) -> Self {
        Self {
            key,
            context_match: ContextMatch::Exact,
            read_view: Bytes::new(),
            write_view: Bytes::new(),
            notify_view: Bytes::new(),
            storage_type: StorageType::NonVolatile,
            status: RowStatus::NotReady,
        }
    }

    fn key(&self) -> &AccessKey {
        &self.key
    }

    fn status(&self) -> RowStatus {
        self.status
    }

    fn set_status(&mut self, status: RowStatus) {
        self.status = status;
    }

    fn storage_type(&self) -> StorageType {
        self.storage_type
    }

    fn set_storage_type(&mut self, storage_type: StorageType) {
        self.storage_type = storage_type;
    }

    fn column(column: u32) -> Option<Column> {
        let syntax = match column {
            COL_CONTEXT_PREFIX => return Some(Column::not_accessible(ADMIN_STRING_32)),
            COL_SECURITY_MODEL => {
                return Some(Column::not_accessible(ColumnSyntax::Integer {
                    min: 0,
                    max: i32::MAX,
                }));
            }
            COL_SECURITY_LEVEL => {
                return Some(Column::not_accessible(ColumnSyntax::Integer { min: 1, max: 3 }));
            }
            COL_CONTEXT_MATCH => ColumnSyntax::Enum(ContextMatch::VALUES),
            COL_READ_VIEW | COL_WRITE_VIEW | COL_NOTIFY_VIEW => ADMIN_STRING_32,
            COL_STORAGE_TYPE => ColumnSyntax::Enum(StorageType::VALUES),
            COL_STATUS => ColumnSyntax::Enum(RowStatus::WRITABLE),
            _ => return None,
        };
        Some(Column::read_create(syntax))
    }

    fn validate_key(key: &AccessKey) -> bool {
        (1..=32).contains(&key.group_name.len()) && key.context_prefix.len() <= 32
    }

    // Every column has a default
    fn is_ready(&self) -> bool {
        true
    }

    fn set_column(
        &mut self,
        column: u32,
        value: &Value,
        _ctx: &ColumnContext<'_, Self>,
    ) -> SetResult {
        match (column, value) {
            (COL_CONTEXT_MATCH, Value::Integer(v)) => match ContextMatch::from_i32(*v) {
                Some(m) => {
                    self.context_match = m;
                    SetResult::Ok
                }
                None => SetResult::WrongValue,
            },
            (COL_READ_VIEW, Value::OctetString(name)) => {
                self.read_view = name.clone();
                SetResult::Ok
            }
            (COL_WRITE_VIEW, Value::OctetString(name)) => {
                self.write_view = name.clone();
                SetResult::Ok
            }
            (COL_NOTIFY_VIEW, Value::OctetString(name)) => {
                self.notify_view = name.clone();
                SetResult::Ok
            }
            _ => SetResult::NotWritable,
        }
    }

    fn get_column(&self, column: u32) -> Option<Value> {
        match column {
            COL_CONTEXT_MATCH => Some(Value::Integer(self.context_match as i32)),
            COL_READ_VIEW => Some(Value::OctetString(self.read_view.clone())),
            COL_WRITE_VIEW => Some(Value::OctetString(self.write_view.clone())),
            COL_NOTIFY_VIEW => Some(Value::OctetString(self.notify_view.clone())),
            _ => None,
        }
    }
}

/// Builder for seeded access entries.
///
/// Typically used via
/// [`MibTablesBuilder::access()`](crate::agent::MibTablesBuilder::access).
///
/// # Example
///
/// ```rust
/// use snmp_rows::agent::MibTables;
/// use snmp_rows::vacm::{SecurityLevel, SecurityModel};
///
/// let tables = MibTables::builder()
///     .access("admin_group", |a| a
///         .security_model(SecurityModel::Usm)
///         .security_level(SecurityLevel::AuthPriv)
///         .read_view("full_view")
///         .write_view("config_view")
///         .notify_view("trap_view"))
///     .build()
///     .unwrap();
///
/// let entry = tables.access().scan().next().unwrap();
/// assert_eq!(&entry.write_view[..], b"config_view");
/// ```
pub struct AccessEntryBuilder {
    group_name: Bytes,
    context_prefix: Bytes,
    security_model: SecurityModel,
    security_level: SecurityLevel,
    context_match: ContextMatch,
    read_view: Bytes,
    write_view: Bytes,
    notify_view: Bytes,
    storage_type: StorageType,
}

impl AccessEntryBuilder {
    /// Create a new access entry builder for a group.
    pub fn new(group_name: impl Into<Bytes>) -> Self {
        Self {
            group_name: group_name.into(),
            context_prefix: Bytes::new(),
            security_model: SecurityModel::Any,
            security_level: SecurityLevel::NoAuthNoPriv,
            context_match: ContextMatch::Exact,
            read_view: Bytes::new(),
            write_view: Bytes::new(),
            notify_view: Bytes::new(),
            storage_type: StorageType::Permanent,
        }
    }

    /// Set the context prefix.
    ///
    /// Most deployments use an empty context (the default).
    pub fn context_prefix(mut self, prefix: impl Into<Bytes>) -> Self {
        self.context_prefix = prefix.into();
        self
    }

    /// Set the security model this entry applies to.
    ///
    /// Default is [`SecurityModel::Any`] which matches all models.
    pub fn security_model(mut self, model: SecurityModel) -> Self {
        self.security_model = model;
        self
    }

    /// Set the minimum security level required.
    ///
    /// Default is [`SecurityLevel::NoAuthNoPriv`].
    pub fn security_level(mut self, level: SecurityLevel) -> Self {
        self.security_level = level;
        self
    }

    /// Set context matching to prefix mode.
    pub fn context_match_prefix(mut self) -> Self {
        self.context_match = ContextMatch::Prefix;
        self
    }

    pub fn read_view(mut self, view: impl Into<Bytes>) -> Self {
        self.read_view = view.into();
        self
    }

    pub fn write_view(mut self, view: impl Into<Bytes>) -> Self {
        self.write_view = view.into();
        self
    }

    pub fn notify_view(mut self, view: impl Into<Bytes>) -> Self {
        self.notify_view = view.into();
        self
    }

    /// Storage type of the seeded row. Default is `permanent`.
    pub fn storage_type(mut self, storage_type: StorageType) -> Self {
        self.storage_type = storage_type;
        self
    }

    /// Build the active row.
    pub fn build(self) -> AccessEntry {
        AccessEntry {
            key: AccessKey {
                group_name: self.group_name,
                context_prefix: self.context_prefix,
                security_model: self.security_model,
                security_level: self.security_level,
            },
            context_match: self.context_match,
            read_view: self.read_view,
            write_view: self.write_view,
            notify_view: self.notify_view,
            storage_type: self.storage_type,
            status: RowStatus::Active,
        }
    }
}
