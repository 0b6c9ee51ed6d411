//! Variable bindings as they arrive in a SET PDU.

use std::fmt;

use crate::oid::Oid;
use crate::value::Value;

/// One `name = value` pair of a PDU.
///
/// The name is a column instance: table entry, column number, then the
/// encoded row index.
#[derive(Debug, Clone, PartialEq)]
pub struct VarBind {
    pub oid: Oid,
    pub value: Value,
}

impl VarBind {
    pub fn new(oid: Oid, value: impl Into<Value>) -> Self {
        Self {
            oid,
            value: value.into(),
        }
    }
}

impl fmt::Display for VarBind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.oid, self.value)
    }
}
