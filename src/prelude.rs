//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```rust
//! use snmp_rows::prelude::*;
//!
//! let tables = MibTables::builder()
//!     .group("public", SecurityModel::V2c, "readers")
//!     .build()
//!     .unwrap();
//! assert_eq!(tables.groups().len(), 1);
//! ```
//!
//! This imports:
//! - Core types: [`Oid`], [`Value`], [`VarBind`]
//! - Tables: [`Agent`], [`MibTables`], [`RequestContext`], [`Response`]
//! - Row lifecycle: [`ConceptualRow`], [`RowStatus`], [`StorageType`]
//! - Error handling: [`Error`], [`ErrorStatus`], [`Result`]
//! - Security identifiers: [`SecurityModel`], [`SecurityLevel`],
//!   [`AuthProtocol`], [`PrivProtocol`]
//! - The [`oid!`] macro for compile-time OID construction

pub use crate::agent::{Agent, MibTables};
pub use crate::error::{Error, ErrorStatus, Result};
pub use crate::handler::{RequestContext, Response};
pub use crate::oid::Oid;
pub use crate::row::{ConceptualRow, RowStatus, StorageType};
pub use crate::usm::{AuthProtocol, PrivProtocol};
pub use crate::vacm::{SecurityLevel, SecurityModel};
pub use crate::value::Value;
pub use crate::varbind::VarBind;

#[doc(no_inline)]
pub use crate::oid;
