//! vacmSecurityToGroupTable rows.

use bytes::Bytes;

use crate::error::IndexErrorKind;
use crate::handler::SetResult;
use crate::index::{self, IndexComponent, IndexKind, RowKey};
use crate::row::{Column, ColumnContext, ColumnSyntax, ConceptualRow, RowStatus, StorageType};
use crate::value::Value;

use super::SecurityModel;

/// vacmSecurityToGroupEntry, 1.3.6.1.6.3.16.1.2.1
const ENTRY: &[u32] = &[1, 3, 6, 1, 6, 3, 16, 1, 2, 1];

const COL_SECURITY_MODEL: u32 = 1;
const COL_SECURITY_NAME: u32 = 2;
const COL_GROUP_NAME: u32 = 3;
const COL_STORAGE_TYPE: u32 = 4;
const COL_STATUS: u32 = 5;

/// Index of the security-to-group table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub security_model: SecurityModel,
    pub security_name: Bytes,
}

impl GroupKey {
    pub fn new(security_model: SecurityModel, security_name: impl Into<Bytes>) -> Self {
        Self {
            security_model,
            security_name: security_name.into(),
        }
    }
}

impl RowKey for GroupKey {
    const SCHEMA: &'static [IndexKind] = &[IndexKind::Integer, IndexKind::OctetString];

    fn components(&self) -> Vec<IndexComponent> {
        vec![
            IndexComponent::Integer(self.security_model.as_u32()),
            IndexComponent::OctetString(self.security_name.clone()),
        ]
    }

    fn from_components(components: Vec<IndexComponent>) -> Result<Self, IndexErrorKind> {
        let mut fields = components.into_iter();
        let model = index::take_u32(&mut fields)?;
        let security_model = match SecurityModel::from_u32(model) {
            Some(SecurityModel::Any) | None => {
                return Err(IndexErrorKind::ValueOutOfRange { value: model });
            }
            Some(m) => m,
        };
        let security_name = index::take_bytes(&mut fields)?;
        Ok(Self {
            security_model,
            security_name,
        })
    }
}

/// Maps a (securityModel, securityName) principal to a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupEntry {
    key: GroupKey,
    pub group_name: Bytes,
    storage_type: StorageType,
    status: RowStatus,
}

impl GroupEntry {
    /// An active, permanent row for agent configuration.
    pub(crate) fn configured(key: GroupKey, group_name: Bytes) -> Self {
        Self {
            key,
            group_name,
            storage_type: StorageType::Permanent,
            status: RowStatus::Active,
        }
    }
}

impl ConceptualRow for GroupEntry {
    type Key = GroupKey;

    const TABLE: &'static str = "vacmSecurityToGroupTable";
    const ENTRY: &'static [u32] = ENTRY;
    const STATUS_COLUMN: u32 = COL_STATUS;
    const STORAGE_TYPE_COLUMN: u32 = COL_STORAGE_TYPE;

    fn new(key: GroupKey) -> Self {
        Self {
            key,
            group_name: Bytes::new(),
            storage_type: StorageType::NonVolatile,
            status: RowStatus::NotReady,
        }
    }

    fn key(&self) -> &GroupKey {
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
        match column {
            COL_SECURITY_MODEL => Some(Column::not_accessible(ColumnSyntax::Integer {
                min: 1,
                max: i32::MAX,
            })),
            COL_SECURITY_NAME => Some(Column::not_accessible(ColumnSyntax::OctetString {
                min: 1,
                max: 32,
            })),
            COL_GROUP_NAME => Some(Column::read_create(ColumnSyntax::OctetString {
                min: 1,
                max: 32,
            })),
            COL_STORAGE_TYPE => Some(Column::read_create(ColumnSyntax::Enum(
                StorageType::VALUES,
            ))),
            COL_STATUS => Some(Column::read_create(ColumnSyntax::Enum(RowStatus::WRITABLE))),
            _ => None,
        }
    }

    fn validate_key(key: &GroupKey) -> bool {
        (1..=32).contains(&key.security_name.len())
    }

    fn is_ready(&self) -> bool {
        !self.group_name.is_empty()
    }

    fn set_column(
        &mut self,
        column: u32,
        value: &Value,
        _ctx: &ColumnContext<'_, Self>,
    ) -> SetResult {
        match (column, value) {
            (COL_GROUP_NAME, Value::OctetString(name)) => {
                self.group_name = name.clone();
                SetResult::Ok
            }
            _ => SetResult::NotWritable,
        }
    }

    fn get_column(&self, column: u32) -> Option<Value> {
        match column {
            COL_GROUP_NAME => Some(Value::OctetString(self.group_name.clone())),
            _ => None,
        }
    }
}
