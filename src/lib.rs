//! # snmp-rows
//!
//! RowStatus (RFC 2579) conceptual-row management for SNMP agents.
//!
//! Managers create, modify and destroy rows of the SNMPv3 administrative
//! tables with ordinary SET PDUs. This crate implements the multi-phase SET
//! transaction behind that, with all-or-nothing semantics per PDU, for:
//!
//! - `usmUserTable` (RFC 3414), rows [`usm::UserEntry`]
//! - `vacmSecurityToGroupTable` (RFC 3415), rows [`vacm::GroupEntry`]
//! - `vacmAccessTable` (RFC 3415), rows [`vacm::AccessEntry`]
//! - `vacmViewTreeFamilyTable` (RFC 3415), rows [`vacm::ViewEntry`]
//!
//! The PDU codec, transport and access-control decisions belong to the
//! surrounding agent. It hands decoded varbinds to [`agent::Agent`] and
//! sends back the [`handler::Response`].
//!
//! # Quick Start
//!
//! ```rust
//! use snmp_rows::agent::MibTables;
//! use snmp_rows::handler::RequestContext;
//! use snmp_rows::vacm::{GroupKey, SecurityLevel, SecurityModel};
//! use snmp_rows::{ErrorStatus, Value, VarBind, oid};
//!
//! let mut tables = MibTables::new();
//! let ctx = RequestContext::usm("admin", SecurityLevel::AuthPriv);
//!
//! // vacmSecurityToGroupStatus.3."bob" = createAndGo,
//! // vacmGroupName.3."bob" = "operators"
//! let response = tables.set(&ctx, &[
//!     VarBind::new(oid!(1, 3, 6, 1, 6, 3, 16, 1, 2, 1, 5, 3, 3, 98, 111, 98), Value::Integer(4)),
//!     VarBind::new(
//!         oid!(1, 3, 6, 1, 6, 3, 16, 1, 2, 1, 3, 3, 3, 98, 111, 98),
//!         Value::from("operators"),
//!     ),
//! ]);
//! assert_eq!(response.error_status, ErrorStatus::NoError);
//!
//! let bob = tables.groups().get_exact(&GroupKey::new(SecurityModel::Usm, "bob")).unwrap();
//! assert_eq!(&bob.group_name[..], b"operators");
//! ```
//!
//! # Modules
//!
//! - [`agent`]: the four tables, the SET coordinator and the async handle
//! - [`handler`]: the per-table phase interface and its generic implementation
//! - [`row`]: RowStatus and StorageType rules, column syntax, row storage
//! - [`index`]: table indexes to and from instance OIDs
//! - [`usm`], [`vacm`]: the row types
//!
//! # Logging
//!
//! Events are emitted through [`tracing`] with `snmp.*` structured fields
//! (`snmp.table`, `snmp.oid`, `snmp.phase`, `snmp.request_id`). Rejections log at `trace`,
//! row creation and destruction at `debug`, broken phase sequences at
//! `warn`.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod agent;
pub mod error;
pub mod handler;
pub mod index;
pub mod oid;
pub mod prelude;
pub mod row;
pub mod usm;
pub mod vacm;
pub mod value;
pub mod varbind;

pub use error::{Error, ErrorStatus, Result};
pub use oid::Oid;
pub use value::Value;
pub use varbind::VarBind;
