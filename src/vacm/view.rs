//! vacmViewTreeFamilyTable rows.

use bytes::Bytes;

use crate::error::IndexErrorKind;
use crate::handler::SetResult;
use crate::index::{self, IndexComponent, IndexKind, RowKey};
use crate::oid::Oid;
use crate::row::{Column, ColumnContext, ColumnSyntax, ConceptualRow, RowStatus, StorageType};
use crate::value::Value;

use super::ViewType;

/// vacmViewTreeFamilyEntry, 1.3.6.1.6.3.16.1.5.2.1
const ENTRY: &[u32] = &[1, 3, 6, 1, 6, 3, 16, 1, 5, 2, 1];

const COL_VIEW_NAME: u32 = 1;
const COL_SUBTREE: u32 = 2;
const COL_MASK: u32 = 3;
const COL_TYPE: u32 = 4;
const COL_STORAGE_TYPE: u32 = 5;
const COL_STATUS: u32 = 6;

/// Index of the view tree family table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewKey {
    pub view_name: Bytes,
    pub subtree: Oid,
}

impl ViewKey {
    pub fn new(view_name: impl Into<Bytes>, subtree: Oid) -> Self {
        Self {
            view_name: view_name.into(),
            subtree,
        }
    }
}

impl RowKey for ViewKey {
    const SCHEMA: &'static [IndexKind] = &[IndexKind::OctetString, IndexKind::ObjectIdentifier];

    fn components(&self) -> Vec<IndexComponent> {
        vec![
            IndexComponent::OctetString(self.view_name.clone()),
            IndexComponent::ObjectIdentifier(self.subtree.clone()),
        ]
    }

    fn from_components(components: Vec<IndexComponent>) -> Result<Self, IndexErrorKind> {
        let mut fields = components.into_iter();
        Ok(Self {
            view_name: index::take_bytes(&mut fields)?,
            subtree: index::take_oid(&mut fields)?,
        })
    }
}

/// One subtree family of a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewEntry {
    key: ViewKey,
    /// Bit mask for wildcard matching (empty = exact match).
    ///
    /// Bit 7 (MSB) of byte 0 corresponds to arc 0 of the subtree, bit 6 to
    /// arc 1, and so on. A 1 bit means the arc must match, a 0 bit accepts
    /// any value. Arcs beyond the mask must match.
    pub mask: Bytes,
    pub view_type: ViewType,
    storage_type: StorageType,
    status: RowStatus,
}

impl ConceptualRow for ViewEntry {
    type Key = ViewKey;

    const TABLE: &'static str = "vacmViewTreeFamilyTable";
    const ENTRY: &'static [u32] = ENTRY;
    const STATUS_COLUMN: u32 = COL_STATUS;
    const STORAGE_TYPE_COLUMN: u32 = COL_STORAGE_TYPE;

    fn new(key: ViewKey) -> Self {
        Self {
            key,
            mask: Bytes::new(),
            view_type: ViewType::Included,
            storage_type: StorageType::NonVolatile,
            status: RowStatus::NotReady,
        }
    }

    fn key(&self) -> &ViewKey {
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
            COL_VIEW_NAME => Some(Column::not_accessible(ColumnSyntax::OctetString {
                min: 1,
                max: 32,
            })),
            COL_SUBTREE => Some(Column::not_accessible(ColumnSyntax::ObjectIdentifier)),
            COL_MASK => Some(Column::read_create(ColumnSyntax::OctetString {
                min: 0,
                max: 16,
            })),
            COL_TYPE => Some(Column::read_create(ColumnSyntax::Enum(ViewType::VALUES))),
            COL_STORAGE_TYPE => Some(Column::read_create(ColumnSyntax::Enum(
                StorageType::VALUES,
            ))),
            COL_STATUS => Some(Column::read_create(ColumnSyntax::Enum(RowStatus::WRITABLE))),
            _ => None,
        }
    }

    fn validate_key(key: &ViewKey) -> bool {
        (1..=32).contains(&key.view_name.len())
    }

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
            (COL_MASK, Value::OctetString(mask)) => {
                self.mask = mask.clone();
                SetResult::Ok
            }
            (COL_TYPE, Value::Integer(v)) => match ViewType::from_i32(*v) {
                Some(t) => {
                    self.view_type = t;
                    SetResult::Ok
                }
                None => SetResult::WrongValue,
            },
            _ => SetResult::NotWritable,
        }
    }

    fn get_column(&self, column: u32) -> Option<Value> {
        match column {
            COL_MASK => Some(Value::OctetString(self.mask.clone())),
            COL_TYPE => Some(Value::Integer(self.view_type as i32)),
            _ => None,
        }
    }
}

/// Builder for the subtree families of one seeded view.
///
/// Typically used via
/// [`MibTablesBuilder::view()`](crate::agent::MibTablesBuilder::view).
///
/// # Example
///
/// ```rust
/// use snmp_rows::agent::MibTables;
/// use snmp_rows::oid;
///
/// let tables = MibTables::builder()
///     .view("system_view", |v| v
///         .include(oid!(1, 3, 6, 1, 2, 1, 1))        // system MIB
///         .exclude(oid!(1, 3, 6, 1, 2, 1, 1, 4)))    // sysContact
///     .build()
///     .unwrap();
///
/// assert_eq!(tables.views().len(), 2);
/// ```
pub struct ViewBuilder {
    name: Bytes,
    storage_type: StorageType,
    families: Vec<(Oid, Bytes, ViewType)>,
}

impl ViewBuilder {
    pub fn new(name: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            storage_type: StorageType::Permanent,
            families: Vec::new(),
        }
    }

    /// Add an included subtree.
    pub fn include(self, oid: Oid) -> Self {
        self.family(oid, Bytes::new(), ViewType::Included)
    }

    /// Add an included subtree with a wildcard mask.
    ///
    /// See [`ViewEntry::mask`] for the mask format.
    pub fn include_masked(self, oid: Oid, mask: impl Into<Bytes>) -> Self {
        self.family(oid, mask.into(), ViewType::Included)
    }

    /// Add an excluded subtree.
    pub fn exclude(self, oid: Oid) -> Self {
        self.family(oid, Bytes::new(), ViewType::Excluded)
    }

    /// Add an excluded subtree with a wildcard mask.
    pub fn exclude_masked(self, oid: Oid, mask: impl Into<Bytes>) -> Self {
        self.family(oid, mask.into(), ViewType::Excluded)
    }

    /// Storage type of the seeded rows. Default is `permanent`.
    pub fn storage_type(mut self, storage_type: StorageType) -> Self {
        self.storage_type = storage_type;
        self
    }

    fn family(mut self, oid: Oid, mask: Bytes, view_type: ViewType) -> Self {
        self.families.push((oid, mask, view_type));
        self
    }

    /// Build one active row per subtree family.
    pub fn build(self) -> Vec<ViewEntry> {
        let Self {
            name,
            storage_type,
            families,
        } = self;

        families
            .into_iter()
            .map(|(subtree, mask, view_type)| ViewEntry {
                key: ViewKey::new(name.clone(), subtree),
                mask,
                view_type,
                storage_type,
                status: RowStatus::Active,
            })
            .collect()
    }
}
