//! The managed tables and the SET entry point.
//!
//! [`MibTables`] owns one [`RowTable`] per dynamically-creatable table and
//! routes OIDs to them. [`Agent`] shares a `MibTables` between tasks and
//! serializes SET PDUs against it, one PDU at a time.
//!
//! # Example
//!
//! ```rust
//! use snmp_rows::agent::{Agent, MibTables};
//! use snmp_rows::handler::RequestContext;
//! use snmp_rows::vacm::{SecurityLevel, SecurityModel};
//! use snmp_rows::{ErrorStatus, Value, VarBind, oid};
//!
//! # async fn example() -> snmp_rows::Result<()> {
//! let agent = Agent::new(
//!     MibTables::builder()
//!         .group("admin", SecurityModel::Usm, "admins")
//!         .build()?,
//! );
//!
//! // vacmSecurityToGroupStatus.3."alice" = createAndWait,
//! // vacmGroupName.3."alice" = "admins"
//! let row = [3, 5, 97, 108, 105, 99, 101];
//! let entry = oid!(1, 3, 6, 1, 6, 3, 16, 1, 2, 1);
//! let response = agent
//!     .handle_set(
//!         &RequestContext::usm("admin", SecurityLevel::AuthPriv),
//!         &[
//!             VarBind::new(entry.child(5).join(&row), Value::Integer(5)),
//!             VarBind::new(entry.child(3).join(&row), Value::from("admins")),
//!         ],
//!     )
//!     .await;
//!
//! assert_eq!(response.error_status, ErrorStatus::NoError);
//! # Ok(())
//! # }
//! ```

mod set_handler;

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::handler::{GetNextResult, GetResult, RequestContext, Response, RowTable, TableHandler};
use crate::oid::Oid;
use crate::row::{ConceptualRow, RowStore};
use crate::usm::{UserBuilder, UserEntry};
use crate::vacm::{
    AccessEntry, AccessEntryBuilder, GroupEntry, GroupKey, SecurityModel, ViewBuilder, ViewEntry,
};
use crate::varbind::VarBind;

pub use set_handler::SetTransaction;

/// Which of the managed tables an OID belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TableId {
    Users,
    Groups,
    Access,
    Views,
}

impl TableId {
    /// In ascending entry OID order.
    const ALL: [TableId; 4] = [Self::Users, Self::Groups, Self::Access, Self::Views];
}

/// The USM and VACM tables of one agent.
#[derive(Debug, Clone, Default)]
pub struct MibTables {
    users: RowTable<UserEntry>,
    groups: RowTable<GroupEntry>,
    access: RowTable<AccessEntry>,
    views: RowTable<ViewEntry>,
}

impl MibTables {
    /// Empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder for tables seeded with configuration rows.
    pub fn builder() -> MibTablesBuilder {
        MibTablesBuilder::new()
    }

    /// usmUserTable.
    pub fn users(&self) -> &RowStore<UserEntry> {
        self.users.rows()
    }

    /// vacmSecurityToGroupTable.
    pub fn groups(&self) -> &RowStore<GroupEntry> {
        self.groups.rows()
    }

    /// vacmAccessTable.
    pub fn access(&self) -> &RowStore<AccessEntry> {
        self.access.rows()
    }

    /// vacmViewTreeFamilyTable.
    pub fn views(&self) -> &RowStore<ViewEntry> {
        self.views.rows()
    }

    pub(crate) fn route(&self, oid: &Oid) -> Option<TableId> {
        TableId::ALL
            .into_iter()
            .find(|&id| self.handler(id).handles(oid))
    }

    pub(crate) fn handler(&self, id: TableId) -> &dyn TableHandler {
        match id {
            TableId::Users => &self.users,
            TableId::Groups => &self.groups,
            TableId::Access => &self.access,
            TableId::Views => &self.views,
        }
    }

    pub(crate) fn handler_mut(&mut self, id: TableId) -> &mut dyn TableHandler {
        match id {
            TableId::Users => &mut self.users,
            TableId::Groups => &mut self.groups,
            TableId::Access => &mut self.access,
            TableId::Views => &mut self.views,
        }
    }

    /// Run one SET PDU against the tables.
    ///
    /// Either every varbind is applied, or none is and the response carries
    /// the error status and the 1-based index of the varbind that failed.
    pub fn set(&mut self, ctx: &RequestContext, varbinds: &[VarBind]) -> Response {
        SetTransaction::new(ctx, varbinds).run(self)
    }

    /// Value of a column instance in any of the tables.
    pub fn get(&self, oid: &Oid) -> GetResult {
        match self.route(oid) {
            Some(id) => self.handler(id).get(oid),
            None => GetResult::NoSuchObject,
        }
    }

    /// Next column instance after `oid` across all tables.
    pub fn get_next(&self, oid: &Oid) -> Result<GetNextResult> {
        for id in TableId::ALL {
            if let GetNextResult::Value(vb) = self.handler(id).get_next(oid)? {
                return Ok(GetNextResult::Value(vb));
            }
        }
        Ok(GetNextResult::EndOfMibView)
    }
}

/// Builder for [`MibTables`] seeded with configuration rows.
///
/// Seeded rows are active with storage type `permanent` unless the row
/// builder says otherwise.
///
/// # Example
///
/// ```rust
/// use snmp_rows::agent::MibTables;
/// use snmp_rows::usm::AuthProtocol;
/// use snmp_rows::vacm::{SecurityLevel, SecurityModel};
/// use snmp_rows::oid;
///
/// let tables = MibTables::builder()
///     // Step 1: Users and their localized keys
///     .user(&b"\x80\x00\x1f\x88\x04agent"[..], "admin", |u| u
///         .auth(AuthProtocol::Sha256, vec![0x5a; 32]))
///
///     // Step 2: Map principals to groups
///     .group("admin", SecurityModel::Usm, "admins")
///     .group("public", SecurityModel::V2c, "readers")
///
///     // Step 3: Grant each group views
///     .access("admins", |a| a
///         .security_model(SecurityModel::Usm)
///         .security_level(SecurityLevel::AuthNoPriv)
///         .read_view("full_view")
///         .write_view("full_view"))
///     .access("readers", |a| a.read_view("system_view"))
///
///     // Step 4: Define views
///     .view("full_view", |v| v.include(oid!(1, 3, 6, 1)))
///     .view("system_view", |v| v.include(oid!(1, 3, 6, 1, 2, 1, 1)))
///
///     // Step 5: Build
///     .build()
///     .unwrap();
///
/// assert_eq!(tables.users().len(), 1);
/// assert_eq!(tables.groups().len(), 2);
/// assert_eq!(tables.access().len(), 2);
/// ```
#[derive(Default)]
pub struct MibTablesBuilder {
    users: Vec<UserEntry>,
    groups: Vec<GroupEntry>,
    access: Vec<AccessEntry>,
    views: Vec<ViewEntry>,
    max_rows: Option<usize>,
}

impl MibTablesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user using a builder function.
    pub fn user<F>(
        mut self,
        engine_id: impl Into<Bytes>,
        user_name: impl Into<Bytes>,
        configure: F,
    ) -> Self
    where
        F: FnOnce(UserBuilder) -> UserBuilder,
    {
        self.users
            .push(configure(UserBuilder::new(engine_id, user_name)).build());
        self
    }

    /// Map a security name to a group.
    ///
    /// The security name is:
    /// - For SNMPv1/v2c: the community string
    /// - For SNMPv3: the USM username
    pub fn group(
        mut self,
        security_name: impl Into<Bytes>,
        security_model: SecurityModel,
        group_name: impl Into<Bytes>,
    ) -> Self {
        self.groups.push(GroupEntry::configured(
            GroupKey::new(security_model, security_name),
            group_name.into(),
        ));
        self
    }

    /// Add an access entry using a builder function.
    pub fn access<F>(mut self, group_name: impl Into<Bytes>, configure: F) -> Self
    where
        F: FnOnce(AccessEntryBuilder) -> AccessEntryBuilder,
    {
        self.access
            .push(configure(AccessEntryBuilder::new(group_name)).build());
        self
    }

    /// Add the subtree families of a view using a builder function.
    pub fn view<F>(mut self, name: impl Into<Bytes>, configure: F) -> Self
    where
        F: FnOnce(ViewBuilder) -> ViewBuilder,
    {
        self.views.extend(configure(ViewBuilder::new(name)).build());
        self
    }

    /// Limit each table to `max_rows` rows.
    ///
    /// Creations beyond the limit fail with `resourceUnavailable`. Seeded
    /// rows are not checked against it.
    pub fn max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    /// Build the tables.
    ///
    /// Fails with [`Error::DuplicateKey`] if two seeded rows share a key.
    pub fn build(self) -> Result<MibTables> {
        let mut tables = MibTables::new();
        seed(&mut tables.users, self.users)?;
        seed(&mut tables.groups, self.groups)?;
        seed(&mut tables.access, self.access)?;
        seed(&mut tables.views, self.views)?;

        tables.users.set_max_rows(self.max_rows);
        tables.groups.set_max_rows(self.max_rows);
        tables.access.set_max_rows(self.max_rows);
        tables.views.set_max_rows(self.max_rows);

        tracing::debug!(
            users = tables.users().len(),
            groups = tables.groups().len(),
            access = tables.access().len(),
            views = tables.views().len(),
            "tables seeded"
        );
        Ok(tables)
    }
}

fn seed<R: ConceptualRow>(table: &mut RowTable<R>, rows: Vec<R>) -> Result<()> {
    rows.into_iter()
        .try_for_each(|row| table.rows_mut().create(row))
}

/// Shared handle to a [`MibTables`] for async callers.
///
/// Cloning the agent is cheap; all clones see the same tables. Each SET PDU
/// holds the lock for its whole six-phase run, so PDUs never interleave.
#[derive(Debug, Clone)]
pub struct Agent {
    tables: Arc<Mutex<MibTables>>,
}

impl Agent {
    pub fn new(tables: MibTables) -> Self {
        Self {
            tables: Arc::new(Mutex::new(tables)),
        }
    }

    /// Process a SET PDU.
    pub async fn handle_set(&self, ctx: &RequestContext, varbinds: &[VarBind]) -> Response {
        let mut tables = self.tables.lock().await;
        tables.set(ctx, varbinds)
    }

    /// Process a SET PDU, turning an error response into [`Error::Snmp`].
    pub async fn set(&self, ctx: &RequestContext, varbinds: &[VarBind]) -> Result<()> {
        let response = self.handle_set(ctx, varbinds).await;
        if response.is_success() {
            return Ok(());
        }
        Err(Error::Snmp {
            status: response.error_status,
            index: u32::try_from(response.error_index).unwrap_or(0),
            oid: response.failed_oid().cloned(),
        })
    }

    pub async fn get(&self, oid: &Oid) -> GetResult {
        self.tables.lock().await.get(oid)
    }

    pub async fn get_next(&self, oid: &Oid) -> Result<GetNextResult> {
        self.tables.lock().await.get_next(oid)
    }

    /// Run `f` against a consistent view of the tables.
    pub async fn read<T>(&self, f: impl FnOnce(&MibTables) -> T) -> T {
        let tables = self.tables.lock().await;
        f(&tables)
    }
}

impl From<MibTables> for Agent {
    fn from(tables: MibTables) -> Self {
        Self::new(tables)
    }
}
