//! Column declarations and the syntactic checks run at RESERVE1.

use crate::handler::SetResult;
use crate::value::Value;

/// Declared SMI syntax of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSyntax {
    /// INTEGER restricted to an enumeration.
    Enum(&'static [i32]),
    /// INTEGER within `min..=max`.
    Integer { min: i32, max: i32 },
    /// OCTET STRING of `min..=max` bytes.
    OctetString { min: usize, max: usize },
    /// OBJECT IDENTIFIER (RowPointer, AutonomousType).
    ObjectIdentifier,
}

/// MAX-ACCESS of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Index-only column, never carried in a varbind.
    NotAccessible,
    ReadOnly,
    ReadCreate,
}

/// One column of a conceptual row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub syntax: ColumnSyntax,
    pub access: Access,
}

impl Column {
    pub const fn read_create(syntax: ColumnSyntax) -> Self {
        Self {
            syntax,
            access: Access::ReadCreate,
        }
    }

    pub const fn read_only(syntax: ColumnSyntax) -> Self {
        Self {
            syntax,
            access: Access::ReadOnly,
        }
    }

    pub const fn not_accessible(syntax: ColumnSyntax) -> Self {
        Self {
            syntax,
            access: Access::NotAccessible,
        }
    }

    pub fn is_readable(&self) -> bool {
        self.access != Access::NotAccessible
    }

    /// Check a SET value against this column without looking at any row.
    pub fn check(&self, value: &Value) -> SetResult {
        if self.access != Access::ReadCreate {
            return SetResult::NotWritable;
        }

        match (self.syntax, value) {
            (ColumnSyntax::Enum(allowed), Value::Integer(v)) => {
                if allowed.contains(v) {
                    SetResult::Ok
                } else {
                    SetResult::WrongValue
                }
            }
            (ColumnSyntax::Integer { min, max }, Value::Integer(v)) => {
                if (min..=max).contains(v) {
                    SetResult::Ok
                } else {
                    SetResult::WrongValue
                }
            }
            (ColumnSyntax::OctetString { min, max }, Value::OctetString(b)) => {
                if (min..=max).contains(&b.len()) {
                    SetResult::Ok
                } else {
                    SetResult::WrongLength
                }
            }
            (ColumnSyntax::ObjectIdentifier, Value::ObjectIdentifier(_)) => SetResult::Ok,
            _ => SetResult::WrongType,
        }
    }
}

/// SnmpAdminString (RFC 3411) of at most 32 octets.
pub const ADMIN_STRING_32: ColumnSyntax = ColumnSyntax::OctetString { min: 0, max: 32 };

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;
    use bytes::Bytes;

    #[test]
    fn test_enum_range() {
        let column = Column::read_create(ColumnSyntax::Enum(&[1, 2]));
        assert!(column.check(&Value::Integer(2)).is_ok());
        assert_eq!(column.check(&Value::Integer(3)), SetResult::WrongValue);
        assert_eq!(column.check(&Value::from("x")), SetResult::WrongType);
    }

    #[test]
    fn test_octet_string_length() {
        let column = Column::read_create(ColumnSyntax::OctetString { min: 1, max: 32 });
        assert!(column.check(&Value::from("g1")).is_ok());
        assert_eq!(column.check(&Value::from("")), SetResult::WrongLength);
        assert_eq!(
            column.check(&Value::OctetString(Bytes::from(vec![b'a'; 33]))),
            SetResult::WrongLength
        );
        assert_eq!(column.check(&Value::Integer(1)), SetResult::WrongType);
    }

    #[test]
    fn test_object_identifier() {
        let column = Column::read_create(ColumnSyntax::ObjectIdentifier);
        assert!(column.check(&Value::from(oid!(0, 0))).is_ok());
        assert_eq!(column.check(&Value::Null), SetResult::WrongType);
    }

    #[test]
    fn test_read_only_columns_not_writable() {
        let column = Column::read_only(ADMIN_STRING_32);
        assert_eq!(column.check(&Value::from("x")), SetResult::NotWritable);
        let index = Column::not_accessible(ColumnSyntax::Integer { min: 1, max: 3 });
        assert_eq!(index.check(&Value::Integer(1)), SetResult::NotWritable);
        assert!(!index.is_readable());
    }
}
