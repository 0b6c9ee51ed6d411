//! Handler types and traits for RowStatus tables.
//!
//! This module provides the interface between the SET coordinator and the
//! tables it manages:
//!
//! - [`TableHandler`] - Object-safe trait for the six SET phases plus reads
//! - [`RowTable`] - The generic implementation, parameterised by a
//!   [`ConceptualRow`](crate::row::ConceptualRow) type
//! - [`RequestContext`] - Information about the incoming request
//! - [`PendingSet`], [`UndoSlot`] - Per-varbind state carried across phases
//! - [`GetResult`], [`GetNextResult`], [`SetResult`], [`Response`] - Results
//!
//! # SET Phases
//!
//! A SET PDU runs in six phases (RESERVE1, RESERVE2, ACTION, COMMIT, UNDO,
//! FREE). Any failure in the first three aborts the PDU and leaves every
//! table as it was before the PDU arrived.
//!
//! ```rust
//! use snmp_rows::handler::{RowTable, TableHandler};
//! use snmp_rows::vacm::GroupEntry;
//! use snmp_rows::oid;
//!
//! let groups: RowTable<GroupEntry> = RowTable::new();
//! assert_eq!(groups.entry(), &oid!(1, 3, 6, 1, 6, 3, 16, 1, 2, 1));
//! assert!(groups.is_status_column(5));
//! ```

mod context;
mod results;
mod table;
mod traits;

pub use context::RequestContext;
pub use results::{GetNextResult, GetResult, Response, SetResult};
pub use table::RowTable;
pub use traits::{PendingSet, TableHandler, UndoSlot};
