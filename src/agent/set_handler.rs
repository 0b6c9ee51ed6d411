//! Six-phase SET transaction (RFC 3416 atomicity over RowStatus tables).

use crate::error::ErrorStatus;
use crate::handler::{PendingSet, RequestContext, Response, SetResult};
use crate::varbind::VarBind;

use super::{MibTables, TableId};

/// One SET PDU in flight.
///
/// Holds a [`PendingSet`] per varbind and drives them through the phases:
///
/// 1. **RESERVE1**, in PDU order: route each varbind to its table and check
///    the value against the column.
/// 2. **RESERVE2**, status columns first, then the others, each group in
///    PDU order: resolve rows, save pre-images, apply values.
/// 3. **ACTION**, same order: settle RowStatus transitions.
/// 4. **COMMIT** if all of the above succeeded, otherwise **UNDO** for every
///    varbind that reached RESERVE2, in reverse.
/// 5. **FREE** for every varbind, always.
///
/// Creating rows status-first lets the other varbinds of the PDU fill in
/// the columns of a row the same PDU creates.
pub struct SetTransaction<'a> {
    ctx: &'a RequestContext,
    varbinds: &'a [VarBind],
    pending: Vec<(TableId, PendingSet)>,
}

/// Where and why a phase failed.
struct Failure {
    /// 0-based varbind index.
    index: usize,
    status: ErrorStatus,
}

impl<'a> SetTransaction<'a> {
    pub fn new(ctx: &'a RequestContext, varbinds: &'a [VarBind]) -> Self {
        Self {
            ctx,
            varbinds,
            pending: Vec::with_capacity(varbinds.len()),
        }
    }

    /// Run every phase and build the response.
    pub fn run(mut self, tables: &mut MibTables) -> Response {
        tracing::debug!(
            snmp.request_id = self.ctx.request_id,
            snmp.security_name = %String::from_utf8_lossy(&self.ctx.security_name),
            varbinds = self.varbinds.len(),
            "SET"
        );

        let outcome = self.execute(tables);

        for (table, set) in &mut self.pending {
            tables.handler_mut(*table).free(set);
        }

        match outcome {
            Ok(()) => Response::success(self.varbinds.to_vec()),
            Err(failure) => {
                tracing::debug!(
                    snmp.request_id = self.ctx.request_id,
                    snmp.error_status = %failure.status,
                    snmp.error_index = failure.index + 1,
                    "SET rejected"
                );
                Response::error(
                    failure.status,
                    (failure.index + 1) as i32,
                    self.varbinds.to_vec(),
                )
            }
        }
    }

    fn execute(&mut self, tables: &mut MibTables) -> Result<(), Failure> {
        self.reserve1(tables)?;

        let order = self.execution_order(tables);
        let mut reserved = Vec::with_capacity(order.len());
        let failed = self
            .reserve2(tables, &order, &mut reserved)
            .and_then(|()| self.action(tables, &order));

        match failed {
            Ok(()) => self.commit(tables, &order),
            Err(failure) => Err(self.undo(tables, &reserved).unwrap_or(failure)),
        }
    }

    /// Route and check every varbind in PDU order.
    ///
    /// After the first failure the remaining routed varbinds are still
    /// queued, unchecked, so FREE reaches them. An unrouted varbind has no
    /// table to free.
    fn reserve1(&mut self, tables: &MibTables) -> Result<(), Failure> {
        let mut failure = None;
        for (index, vb) in self.varbinds.iter().enumerate() {
            let Some(table) = tables.route(&vb.oid) else {
                tracing::trace!(snmp.oid = %vb.oid, "no table for OID");
                failure.get_or_insert(Failure::at(index, SetResult::NoSuchName));
                continue;
            };
            let handler = tables.handler(table);
            let mut set = PendingSet::new(index, handler.entry(), vb.oid.clone(), vb.value.clone());

            if failure.is_none() {
                let result = handler.reserve1(&mut set);
                if !result.is_ok() {
                    tracing::trace!(
                        snmp.phase = "RESERVE1",
                        snmp.table = handler.name(),
                        snmp.oid = %vb.oid,
                        ?result,
                        "phase failed"
                    );
                    failure = Some(Failure::at(index, result));
                }
            }
            self.pending.push((table, set));
        }
        failure.map_or(Ok(()), Err)
    }

    /// Positions in `pending`: status columns first, then the rest, each in
    /// PDU order.
    fn execution_order(&self, tables: &MibTables) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.pending.len()).collect();
        order.sort_by_key(|&i| {
            let (table, set) = &self.pending[i];
            !tables.handler(*table).is_status_column(set.column)
        });
        order
    }

    fn reserve2(
        &mut self,
        tables: &mut MibTables,
        order: &[usize],
        reserved: &mut Vec<usize>,
    ) -> Result<(), Failure> {
        for &i in order {
            let (table, set) = &mut self.pending[i];
            reserved.push(i);
            let result = tables.handler_mut(*table).reserve2(self.ctx, set);
            if !result.is_ok() {
                tracing::trace!(
                    snmp.phase = "RESERVE2",
                    snmp.oid = %set.oid,
                    ?result,
                    "phase failed"
                );
                return Err(Failure::at(set.index, result));
            }
        }
        Ok(())
    }

    fn action(&mut self, tables: &mut MibTables, order: &[usize]) -> Result<(), Failure> {
        for &i in order {
            let (table, set) = &mut self.pending[i];
            let result = tables.handler_mut(*table).action(self.ctx, set);
            if !result.is_ok() {
                tracing::trace!(
                    snmp.phase = "ACTION",
                    snmp.oid = %set.oid,
                    ?result,
                    "phase failed"
                );
                return Err(Failure::at(set.index, result));
            }
        }
        Ok(())
    }

    /// Restore pre-images in reverse RESERVE2 order.
    ///
    /// Returns the failure to report if an undo itself fails.
    fn undo(&mut self, tables: &mut MibTables, reserved: &[usize]) -> Option<Failure> {
        let mut undo_failed = None;
        for &i in reserved.iter().rev() {
            let (table, set) = &mut self.pending[i];
            let result = tables.handler_mut(*table).undo(self.ctx, set);
            if !result.is_ok() {
                tracing::warn!(snmp.phase = "UNDO", snmp.oid = %set.oid, ?result, "phase failed");
                undo_failed.get_or_insert(Failure::at(set.index, SetResult::UndoFailed));
            }
        }
        undo_failed
    }

    /// Commit every varbind. A failure is reported but does not stop the
    /// remaining commits.
    fn commit(&mut self, tables: &mut MibTables, order: &[usize]) -> Result<(), Failure> {
        let mut first_failure = None;
        for &i in order {
            let (table, set) = &mut self.pending[i];
            let result = tables.handler_mut(*table).commit(self.ctx, set);
            if !result.is_ok() {
                tracing::warn!(snmp.phase = "COMMIT", snmp.oid = %set.oid, ?result, "phase failed");
                first_failure.get_or_insert(Failure::at(set.index, result));
            }
        }
        first_failure.map_or(Ok(()), Err)
    }
}

impl Failure {
    fn at(index: usize, result: SetResult) -> Self {
        Self {
            index,
            status: result.to_error_status(),
        }
    }
}
