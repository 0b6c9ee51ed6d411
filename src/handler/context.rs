//! Request context for table handlers.

use bytes::Bytes;

use crate::vacm::{SecurityLevel, SecurityModel};

/// Information about the SET request being served.
///
/// Supplied by the surrounding agent once the message has been
/// authenticated; the row engine only reads it.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Security model used.
    pub security_model: SecurityModel,
    /// Security name (community string or username).
    pub security_name: Bytes,
    /// Security level of the message.
    pub security_level: SecurityLevel,
    /// Context name (empty for the default context).
    pub context_name: Bytes,
    /// Request ID from the PDU.
    pub request_id: i32,
}

impl RequestContext {
    /// Context for a USM principal at the given level.
    pub fn usm(security_name: impl Into<Bytes>, security_level: SecurityLevel) -> Self {
        Self {
            security_model: SecurityModel::Usm,
            security_name: security_name.into(),
            security_level,
            context_name: Bytes::new(),
            request_id: 0,
        }
    }

    /// Set the request ID.
    pub fn with_request_id(mut self, request_id: i32) -> Self {
        self.request_id = request_id;
        self
    }
}
