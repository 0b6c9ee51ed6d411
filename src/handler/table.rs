//! Generic RowStatus table handler.

use crate::error::Result;
use crate::index::{RowKey, decode_partial};
use crate::oid::Oid;
use crate::row::{
    ColumnContext, ConceptualRow, RowStatus, RowStore, StorageType, Transition, status,
};
use crate::value::Value;
use crate::varbind::VarBind;

use super::{GetNextResult, GetResult, PendingSet, RequestContext, SetResult, TableHandler};

/// A dynamically-creatable table: a [`RowStore`] plus the SET phases,
/// written once for every row type.
#[derive(Debug, Clone)]
pub struct RowTable<R: ConceptualRow> {
    entry: Oid,
    rows: RowStore<R>,
    max_rows: Option<usize>,
}

impl<R: ConceptualRow> RowTable<R> {
    pub fn new() -> Self {
        Self {
            entry: Oid::from_slice(R::ENTRY),
            rows: RowStore::new(),
            max_rows: None,
        }
    }

    /// Refuse creations once `limit` rows exist.
    pub(crate) fn set_max_rows(&mut self, limit: Option<usize>) {
        self.max_rows = limit;
    }

    pub fn rows(&self) -> &RowStore<R> {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut RowStore<R> {
        &mut self.rows
    }

    /// OID of `column` for the row with `key`.
    pub fn instance_oid(&self, column: u32, key: &R::Key) -> Oid {
        self.entry.child(column).join(key.to_index().arcs())
    }

    fn read_column(row: &R, column: u32) -> Option<Value> {
        if column == R::STATUS_COLUMN {
            Some(Value::Integer(row.status().as_i32()))
        } else if column == R::STORAGE_TYPE_COLUMN {
            Some(Value::Integer(row.storage_type().as_i32()))
        } else {
            row.get_column(column)
        }
    }

    fn readable(column: u32) -> bool {
        R::column(column).is_some_and(|c| c.is_readable())
    }

    fn reserve_status(
        &mut self,
        key: &R::Key,
        existing: Option<&R>,
        set: &mut PendingSet,
    ) -> SetResult {
        let Some(intent) = set.value.as_i32().and_then(RowStatus::from_i32) else {
            return SetResult::WrongValue;
        };

        let transition = match status::plan(existing.map(|r| r.status()), intent) {
            Ok(t) => t,
            Err(result) => {
                tracing::trace!(
                    snmp.table = R::TABLE,
                    snmp.oid = %set.oid,
                    current = ?existing.map(|r| r.status()),
                    %intent,
                    "status transition rejected"
                );
                return result;
            }
        };

        // A read-only row accepts only a write of its own status
        if transition != Transition::NoOp
            && existing.is_some_and(|r| r.storage_type() == StorageType::ReadOnly)
        {
            return SetResult::WrongValue;
        }

        match transition {
            Transition::Create(intent) => {
                if !R::validate_key(key) {
                    return SetResult::NoCreation;
                }
                if self.max_rows.is_some_and(|max| self.rows.stored() >= max) {
                    tracing::debug!(snmp.table = R::TABLE, max_rows = ?self.max_rows, "table full");
                    return SetResult::ResourceUnavailable;
                }
                let mut row = R::new(key.clone());
                row.set_status(intent);
                if let Err(e) = self.rows.create(row) {
                    tracing::warn!(snmp.table = R::TABLE, error = %e, "create on occupied key");
                    return SetResult::GenErr;
                }
            }
            Transition::Destroy => {
                if existing.is_some_and(|r| !r.storage_type().is_deletable()) {
                    return SetResult::WrongValue;
                }
            }
            _ => {}
        }

        set.transition = Some(transition);
        SetResult::Ok
    }

    fn reserve_column(
        &mut self,
        ctx: &RequestContext,
        existing: Option<&R>,
        set: &PendingSet,
    ) -> SetResult {
        let Some(row) = existing else {
            return SetResult::InconsistentName;
        };
        if row.storage_type() == StorageType::ReadOnly {
            return SetResult::WrongValue;
        }

        let mut updated = row.clone();
        let result = if set.column == R::STORAGE_TYPE_COLUMN {
            match set.value.as_i32().and_then(StorageType::from_i32) {
                Some(to) => {
                    let result = updated.check_storage_type(to);
                    if result.is_ok() {
                        updated.set_storage_type(to);
                    }
                    result
                }
                None => SetResult::WrongValue,
            }
        } else {
            let column_ctx = ColumnContext {
                request: ctx,
                rows: &self.rows,
            };
            updated.set_column(set.column, &set.value, &column_ctx)
        };

        if result.is_ok() {
            self.rows.replace(updated);
        }
        result
    }
}

impl<R: ConceptualRow> Default for RowTable<R> {
    fn default() -> Self {
        Self::new()
    }
}

fn decoded_key<K: RowKey>(set: &PendingSet) -> Option<K> {
    set.undo
        .key
        .as_ref()
        .and_then(|k| k.downcast_ref::<K>())
        .cloned()
}

impl<R: ConceptualRow> TableHandler for RowTable<R> {
    fn name(&self) -> &'static str {
        R::TABLE
    }

    fn entry(&self) -> &Oid {
        &self.entry
    }

    fn is_status_column(&self, column: u32) -> bool {
        column == R::STATUS_COLUMN
    }

    fn reserve1(&self, set: &mut PendingSet) -> SetResult {
        match R::column(set.column) {
            Some(column) => column.check(&set.value),
            None => SetResult::NoCreation,
        }
    }

    fn reserve2(&mut self, ctx: &RequestContext, set: &mut PendingSet) -> SetResult {
        let key = match R::Key::from_index(set.instance.arcs()) {
            Ok(key) => key,
            Err(e) => {
                tracing::trace!(
                    snmp.table = R::TABLE,
                    snmp.oid = %set.oid,
                    error = %e,
                    "bad index"
                );
                return SetResult::InconsistentName;
            }
        };

        let existing = self.rows.get(&key).cloned();
        let result = if set.column == R::STATUS_COLUMN {
            self.reserve_status(&key, existing.as_ref(), set)
        } else {
            self.reserve_column(ctx, existing.as_ref(), set)
        };

        if result.is_ok() {
            set.undo.pre_image = Some(Box::new(existing));
            set.undo.applied = true;
        }
        set.undo.key = Some(Box::new(key));
        result
    }

    fn action(&mut self, _ctx: &RequestContext, set: &mut PendingSet) -> SetResult {
        let Some(key) = decoded_key::<R::Key>(set) else {
            return SetResult::GenErr;
        };
        let Some(mut row) = self.rows.get(&key).cloned() else {
            tracing::warn!(
                snmp.table = R::TABLE,
                snmp.oid = %set.oid,
                "row vanished before ACTION"
            );
            return SetResult::GenErr;
        };

        // Another varbind of this PDU is destroying the row
        if row.status() == RowStatus::Destroy {
            return SetResult::InconsistentValue;
        }

        let current = row.status();
        let next = match set.transition {
            Some(transition) => match status::resolve(transition, current, row.is_ready()) {
                Ok(next) => next,
                Err(result) => {
                    tracing::trace!(
                        snmp.table = R::TABLE,
                        snmp.oid = %set.oid,
                        ?transition,
                        "row not ready"
                    );
                    return result;
                }
            },
            None if current == RowStatus::NotReady && row.is_ready() => RowStatus::NotInService,
            None => current,
        };

        if next != current {
            row.set_status(next);
            self.rows.replace(row);
        }
        SetResult::Ok
    }

    fn commit(&mut self, _ctx: &RequestContext, set: &mut PendingSet) -> SetResult {
        let Some(key) = decoded_key::<R::Key>(set) else {
            return SetResult::GenErr;
        };

        let present = match set.transition {
            Some(Transition::Destroy) => {
                let removed = self.rows.remove(&key).is_some();
                if removed {
                    tracing::debug!(snmp.table = R::TABLE, ?key, "row destroyed");
                }
                removed
            }
            Some(Transition::Create(_)) => match self.rows.get(&key) {
                Some(row) => {
                    tracing::debug!(
                        snmp.table = R::TABLE,
                        ?key,
                        status = %row.status(),
                        "row created"
                    );
                    true
                }
                None => false,
            },
            _ => self.rows.get(&key).is_some(),
        };

        set.undo.pre_image = None;
        set.undo.applied = false;

        if !present {
            tracing::warn!(snmp.table = R::TABLE, snmp.oid = %set.oid, "row missing at COMMIT");
            return SetResult::GenErr;
        }
        SetResult::Ok
    }

    fn undo(&mut self, _ctx: &RequestContext, set: &mut PendingSet) -> SetResult {
        if !set.undo.applied {
            return SetResult::Ok;
        }
        let Some(key) = decoded_key::<R::Key>(set) else {
            return SetResult::UndoFailed;
        };
        let Some(pre_image) = set
            .undo
            .pre_image
            .take()
            .and_then(|p| p.downcast::<Option<R>>().ok())
        else {
            return SetResult::UndoFailed;
        };

        match *pre_image {
            Some(row) => {
                self.rows.replace(row);
            }
            None => {
                self.rows.remove(&key);
            }
        }
        set.undo.applied = false;
        SetResult::Ok
    }

    fn get(&self, oid: &Oid) -> GetResult {
        let Some((&column, instance)) = oid
            .strip_prefix(&self.entry)
            .and_then(|suffix| suffix.split_first())
        else {
            return GetResult::NoSuchObject;
        };
        if !Self::readable(column) {
            return GetResult::NoSuchObject;
        }

        R::Key::from_index(instance)
            .ok()
            .and_then(|key| self.rows.get_exact(&key))
            .and_then(|row| Self::read_column(row, column))
            .map(GetResult::Value)
            .unwrap_or(GetResult::NoSuchInstance)
    }

    fn get_next(&self, oid: &Oid) -> Result<GetNextResult> {
        let (first_column, partial) = match oid.strip_prefix(&self.entry) {
            Some([]) => (1, Vec::new()),
            Some([column, rest @ ..]) if Self::readable(*column) => {
                (*column, decode_partial(R::Key::SCHEMA, rest)?)
            }
            // Unreadable column: continue with the next one from its start
            Some([column, ..]) => (column.saturating_add(1), Vec::new()),
            None if oid < &self.entry => (1, Vec::new()),
            None => return Ok(GetNextResult::EndOfMibView),
        };

        for column in first_column..=R::STATUS_COLUMN {
            if !Self::readable(column) {
                continue;
            }
            let after = if column == first_column {
                partial.as_slice()
            } else {
                &[]
            };
            if let Some(row) = self.rows.next_after(after)
                && let Some(value) = Self::read_column(row, column)
            {
                let oid = self.instance_oid(column, row.key());
                return Ok(GetNextResult::Value(VarBind::new(oid, value)));
            }
        }

        Ok(GetNextResult::EndOfMibView)
    }
}
