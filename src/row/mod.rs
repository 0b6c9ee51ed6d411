//! Conceptual rows and their lifecycle.
//!
//! A conceptual row is one entry of a dynamically-creatable MIB table. Each
//! row type describes itself through [`ConceptualRow`]; the six SET phases
//! are implemented once, generically, by
//! [`RowTable`](crate::handler::RowTable).
//!
//! - [`RowStatus`] and the transition rules in [`status`]
//! - [`StorageType`] and its conversion rules
//! - [`Column`] declarations checked at RESERVE1
//! - [`RowStore`], the ordered per-table row container

pub mod status;
mod storage;
mod store;
mod syntax;

use std::fmt;

pub use status::{RowStatus, Transition};
pub use storage::StorageType;
pub use store::{RowStore, Scan};
pub use syntax::{ADMIN_STRING_32, Access, Column, ColumnSyntax};

use crate::handler::{RequestContext, SetResult};
use crate::index::RowKey;
use crate::value::Value;

/// Descriptor of a row type.
///
/// Implementors hold the column values of one row. The generic table
/// handler takes care of the RowStatus and StorageType columns and of the
/// index; everything type-specific goes through
/// [`set_column`](ConceptualRow::set_column) and
/// [`get_column`](ConceptualRow::get_column).
pub trait ConceptualRow: Clone + fmt::Debug + Send + Sync + 'static {
    type Key: RowKey;

    /// Table name, used in logs and errors.
    const TABLE: &'static str;
    /// OID of the table's entry object (`...Entry`).
    const ENTRY: &'static [u32];
    /// Column number of the RowStatus column. Also the highest column.
    const STATUS_COLUMN: u32;
    /// Column number of the StorageType column.
    const STORAGE_TYPE_COLUMN: u32;

    /// A fresh row holding the MIB defaults.
    fn new(key: Self::Key) -> Self;

    fn key(&self) -> &Self::Key;

    fn status(&self) -> RowStatus;

    fn set_status(&mut self, status: RowStatus);

    fn storage_type(&self) -> StorageType;

    fn set_storage_type(&mut self, storage_type: StorageType);

    /// Declaration of `column`, or `None` if the entry has no such column.
    fn column(column: u32) -> Option<Column>;

    /// Size constraints a key must meet for a row to be created.
    fn validate_key(_key: &Self::Key) -> bool {
        true
    }

    /// Whether every column without a default has been set.
    fn is_ready(&self) -> bool;

    /// Whether this row may move to storage type `to`.
    fn check_storage_type(&self, to: StorageType) -> SetResult {
        self.storage_type().check_transition(to)
    }

    /// Apply a write to a type-specific column.
    ///
    /// The value already passed [`Column::check`]. Status and storage type
    /// columns never reach this method.
    fn set_column(
        &mut self,
        column: u32,
        value: &Value,
        ctx: &ColumnContext<'_, Self>,
    ) -> SetResult;

    /// Read a type-specific column.
    fn get_column(&self, column: u32) -> Option<Value>;
}

/// What a column write can see besides the row it modifies.
pub struct ColumnContext<'a, R: ConceptualRow> {
    /// The request being served.
    pub request: &'a RequestContext,
    /// All rows of the table, including the pre-write version of this one.
    pub rows: &'a RowStore<R>,
}
