//! Ordered row storage for one table.

use crate::error::{Error, Result};
use crate::index::{IndexComponent, RowKey};

use super::ConceptualRow;

/// Rows of one table, kept sorted by key.
///
/// Key order is field-wise: integers numerically, octet strings byte-wise,
/// OIDs arc-by-arc, in index declaration order. This is not the order of the
/// encoded instance OIDs, since length-prefixed strings sort by length
/// first in OID order.
///
/// Read operations ([`get_exact`](RowStore::get_exact),
/// [`scan`](RowStore::scan), [`next_after`](RowStore::next_after)) skip rows
/// that carry a transient intent status. The SET phases use
/// [`get`](RowStore::get) and [`replace`](RowStore::replace), which see
/// every row.
#[derive(Debug, Clone)]
pub struct RowStore<R> {
    /// Entries are kept sorted by key
    rows: Vec<R>,
}

impl<R: ConceptualRow> RowStore<R> {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    fn position(&self, key: &R::Key) -> std::result::Result<usize, usize> {
        self.rows.binary_search_by(|r| r.key().cmp(key))
    }

    /// Visible row with exactly this key.
    pub fn get_exact(&self, key: &R::Key) -> Option<&R> {
        self.get(key).filter(|r| r.status().is_visible())
    }

    /// Row with exactly this key, in whatever state.
    pub fn get(&self, key: &R::Key) -> Option<&R> {
        self.position(key).ok().map(|idx| &self.rows[idx])
    }

    /// Insert a new row.
    pub fn create(&mut self, row: R) -> Result<()> {
        match self.position(row.key()) {
            Ok(_) => Err(Error::DuplicateKey { table: R::TABLE }),
            Err(idx) => {
                self.rows.insert(idx, row);
                Ok(())
            }
        }
    }

    /// Insert or overwrite, returning the previous row with the same key.
    pub fn replace(&mut self, row: R) -> Option<R> {
        match self.position(row.key()) {
            Ok(idx) => Some(std::mem::replace(&mut self.rows[idx], row)),
            Err(idx) => {
                self.rows.insert(idx, row);
                None
            }
        }
    }

    pub fn remove(&mut self, key: &R::Key) -> Option<R> {
        self.position(key).ok().map(|idx| self.rows.remove(idx))
    }

    /// Cursor over visible rows in ascending key order.
    pub fn scan(&self) -> Scan<'_, R> {
        Scan {
            rows: self.rows.iter(),
        }
    }

    /// First visible row whose key is strictly greater than `partial`.
    ///
    /// `partial` is a leading run of key fields as produced by
    /// [`decode_partial`](crate::index::decode_partial); missing trailing
    /// fields compare lower than any present value.
    pub fn next_after(&self, partial: &[IndexComponent]) -> Option<&R> {
        let start = self
            .rows
            .partition_point(|r| r.key().components().as_slice() <= partial);
        self.rows[start..].iter().find(|r| r.status().is_visible())
    }

    /// Number of rows including transient ones.
    pub(crate) fn stored(&self) -> usize {
        self.rows.len()
    }

    /// Number of visible rows.
    pub fn len(&self) -> usize {
        self.scan().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R: ConceptualRow> Default for RowStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cursor returned by [`RowStore::scan`].
pub struct Scan<'a, R> {
    rows: std::slice::Iter<'a, R>,
}

impl<'a, R: ConceptualRow> Iterator for Scan<'a, R> {
    type Item = &'a R;

    fn next(&mut self) -> Option<&'a R> {
        self.rows.by_ref().find(|r| r.status().is_visible())
    }
}
