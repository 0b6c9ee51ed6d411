//! TableHandler trait and per-varbind SET state.

use std::any::Any;

use crate::error::Result;
use crate::oid::Oid;
use crate::row::Transition;
use crate::value::Value;

use super::{GetNextResult, GetResult, RequestContext, SetResult};

/// Handler for one dynamically-creatable table.
///
/// The SET coordinator drives every varbind of a PDU through the phases
/// below. All varbinds finish a phase before any starts the next one.
///
/// 1. [`reserve1`](TableHandler::reserve1): syntax check of the value
///    against the column. Must not look at rows.
/// 2. [`reserve2`](TableHandler::reserve2): decode the index, resolve the
///    row, save its pre-image and apply the value.
/// 3. [`action`](TableHandler::action): settle RowStatus transitions now
///    that every column of the PDU is applied.
/// 4. [`commit`](TableHandler::commit): make the change final.
/// 5. [`undo`](TableHandler::undo): restore the pre-image; called instead
///    of `commit` when anything failed in RESERVE2 or ACTION.
/// 6. [`free`](TableHandler::free): release per-varbind state. Always
///    called exactly once.
///
/// State that must survive between phases lives in the [`PendingSet`], not
/// in the handler.
///
/// # Bounds
///
/// Handlers are owned by [`MibTables`](crate::agent::MibTables), which the
/// [`Agent`](crate::agent::Agent) shares between tasks, hence `Send + Sync`.
pub trait TableHandler: Send + Sync + 'static {
    /// Table name, for logs.
    fn name(&self) -> &'static str;

    /// OID of the table's entry object.
    fn entry(&self) -> &Oid;

    /// Whether `column` is the RowStatus column.
    fn is_status_column(&self, column: u32) -> bool;

    /// Check if this handler handles the given OID.
    ///
    /// Default implementation returns true if the OID starts with
    /// the entry OID.
    fn handles(&self, oid: &Oid) -> bool {
        oid.starts_with(self.entry())
    }

    fn reserve1(&self, set: &mut PendingSet) -> SetResult;

    fn reserve2(&mut self, ctx: &RequestContext, set: &mut PendingSet) -> SetResult;

    fn action(&mut self, ctx: &RequestContext, set: &mut PendingSet) -> SetResult;

    fn commit(&mut self, ctx: &RequestContext, set: &mut PendingSet) -> SetResult;

    fn undo(&mut self, ctx: &RequestContext, set: &mut PendingSet) -> SetResult;

    fn free(&mut self, set: &mut PendingSet) {
        set.undo = UndoSlot::default();
        set.transition = None;
    }

    /// Value of a column instance.
    fn get(&self, oid: &Oid) -> GetResult;

    /// Next visible column instance after `oid`, in column-major order.
    fn get_next(&self, oid: &Oid) -> Result<GetNextResult>;
}

/// One varbind of a SET PDU, with the state it accumulates across phases.
#[derive(Debug)]
pub struct PendingSet {
    /// Position in the PDU, 0-based.
    pub index: usize,
    pub oid: Oid,
    pub value: Value,
    /// Column number, the first arc after the entry OID.
    pub column: u32,
    /// Instance identifier, the arcs after the column.
    pub instance: Oid,
    /// RowStatus transition planned at RESERVE2.
    pub transition: Option<Transition>,
    pub undo: UndoSlot,
}

impl PendingSet {
    /// Split `oid` below `entry` into column and instance.
    ///
    /// `oid` must start with `entry`; an OID naming the entry itself gets
    /// column 0, which no table declares.
    pub fn new(index: usize, entry: &Oid, oid: Oid, value: Value) -> Self {
        let suffix = oid.strip_prefix(entry).unwrap_or(&[]);
        let (column, instance) = match suffix.split_first() {
            Some((&column, rest)) => (column, Oid::from_slice(rest)),
            None => (0, Oid::empty()),
        };

        Self {
            index,
            oid,
            value,
            column,
            instance,
            transition: None,
            undo: UndoSlot::default(),
        }
    }
}

/// Per-varbind scratch owned by the table handler.
///
/// The handler stores its decoded key and the row pre-image here, typed as
/// it likes; the coordinator only moves the slot around.
#[derive(Default)]
pub struct UndoSlot {
    /// Decoded index.
    pub key: Option<Box<dyn Any + Send + Sync>>,
    /// Row as it was before RESERVE2 touched it (`None` inside when absent).
    pub pre_image: Option<Box<dyn Any + Send + Sync>>,
    /// Whether RESERVE2 succeeded and `pre_image` must be restored on undo.
    pub applied: bool,
}

impl std::fmt::Debug for UndoSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UndoSlot")
            .field("key", &self.key.is_some())
            .field("pre_image", &self.pre_image.is_some())
            .field("applied", &self.applied)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    #[test]
    fn test_pending_set_splits_column_and_instance() {
        let entry = oid!(1, 3, 6, 1, 6, 3, 16, 1, 2, 1);
        let set = PendingSet::new(
            2,
            &entry,
            entry.child(5).join(&[3, 5, 97, 108, 105, 99, 101]),
            Value::Integer(4),
        );

        assert_eq!(set.index, 2);
        assert_eq!(set.column, 5);
        assert_eq!(set.instance.arcs(), &[3, 5, 97, 108, 105, 99, 101]);
        assert!(set.transition.is_none());
        assert!(!set.undo.applied);
    }

    #[test]
    fn test_pending_set_on_entry_oid() {
        let entry = oid!(1, 3, 6, 1, 6, 3, 16, 1, 2, 1);
        let set = PendingSet::new(0, &entry, entry.clone(), Value::Null);
        assert_eq!(set.column, 0);
        assert!(set.instance.is_empty());
    }
}
