//! usmUserTable rows.

use bytes::Bytes;

use crate::error::IndexErrorKind;
use crate::handler::SetResult;
use crate::index::{self, IndexComponent, IndexKind, RowKey};
use crate::oid::Oid;
use crate::row::{Column, ColumnContext, ColumnSyntax, ConceptualRow, RowStatus, StorageType};
use crate::value::Value;

use super::key_change::{KeyChangeError, SecretKey, decode_keychange};
use super::{AuthProtocol, PrivProtocol, auth_oid, parse_auth_oid, parse_priv_oid, priv_oid};

/// usmUserEntry, 1.3.6.1.6.3.15.1.2.2.1
const ENTRY: &[u32] = &[1, 3, 6, 1, 6, 3, 15, 1, 2, 2, 1];

const COL_ENGINE_ID: u32 = 1;
const COL_NAME: u32 = 2;
const COL_SECURITY_NAME: u32 = 3;
const COL_CLONE_FROM: u32 = 4;
const COL_AUTH_PROTOCOL: u32 = 5;
const COL_AUTH_KEY_CHANGE: u32 = 6;
const COL_OWN_AUTH_KEY_CHANGE: u32 = 7;
const COL_PRIV_PROTOCOL: u32 = 8;
const COL_PRIV_KEY_CHANGE: u32 = 9;
const COL_OWN_PRIV_KEY_CHANGE: u32 = 10;
const COL_PUBLIC: u32 = 11;
const COL_STORAGE_TYPE: u32 = 12;
const COL_STATUS: u32 = 13;

/// Longest KeyChange value: random and delta for a SHA-512 key.
const KEY_CHANGE: ColumnSyntax = ColumnSyntax::OctetString { min: 0, max: 128 };

/// Index of the user table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserKey {
    pub engine_id: Bytes,
    pub user_name: Bytes,
}

impl UserKey {
    pub fn new(engine_id: impl Into<Bytes>, user_name: impl Into<Bytes>) -> Self {
        Self {
            engine_id: engine_id.into(),
            user_name: user_name.into(),
        }
    }
}

impl RowKey for UserKey {
    const SCHEMA: &'static [IndexKind] = &[IndexKind::OctetString, IndexKind::OctetString];

    fn components(&self) -> Vec<IndexComponent> {
        vec![
            IndexComponent::OctetString(self.engine_id.clone()),
            IndexComponent::OctetString(self.user_name.clone()),
        ]
    }

    fn from_components(components: Vec<IndexComponent>) -> Result<Self, IndexErrorKind> {
        let mut fields = components.into_iter();
        Ok(Self {
            engine_id: index::take_bytes(&mut fields)?,
            user_name: index::take_bytes(&mut fields)?,
        })
    }
}

/// One USM user, local or remote, identified by (engineID, userName).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEntry {
    key: UserKey,
    /// usmUserSecurityName, the model-independent name of the user.
    pub security_name: Bytes,
    clone_from: Option<UserKey>,
    /// Keys were installed, by cloning or by configuration.
    keyed: bool,
    auth_protocol: Option<AuthProtocol>,
    auth_key: SecretKey,
    priv_protocol: Option<PrivProtocol>,
    priv_key: SecretKey,
    /// usmUserPublic, set by managers to verify key changes took effect.
    pub public: Bytes,
    storage_type: StorageType,
    status: RowStatus,
}

impl UserEntry {
    pub fn auth_protocol(&self) -> Option<AuthProtocol> {
        self.auth_protocol
    }

    pub fn priv_protocol(&self) -> Option<PrivProtocol> {
        self.priv_protocol
    }

    pub fn auth_key(&self) -> &SecretKey {
        &self.auth_key
    }

    pub fn priv_key(&self) -> &SecretKey {
        &self.priv_key
    }

    /// The user this row was cloned from, if it was created by cloning.
    pub fn clone_from(&self) -> Option<&UserKey> {
        self.clone_from.as_ref()
    }

    /// OID of this user's usmUserSecurityName instance, the value a
    /// manager writes to another row's cloneFrom to clone this one.
    pub fn clone_pointer(&self) -> Oid {
        Oid::from_slice(ENTRY)
            .child(COL_SECURITY_NAME)
            .join(self.key.to_index().arcs())
    }

    fn set_clone_from(&mut self, pointer: &Oid, ctx: &ColumnContext<'_, Self>) -> SetResult {
        let source = Oid::from_slice(ENTRY).child(COL_SECURITY_NAME);
        let Some(key) = pointer
            .strip_prefix(&source)
            .and_then(|index| UserKey::from_index(index).ok())
        else {
            return SetResult::InconsistentName;
        };
        let Some(template) = ctx
            .rows
            .get_exact(&key)
            .filter(|row| matches!(row.status(), RowStatus::Active | RowStatus::NotInService))
        else {
            return SetResult::InconsistentName;
        };

        // Cloning happens once; later writes succeed without effect
        if self.keyed {
            return SetResult::Ok;
        }

        self.auth_protocol = template.auth_protocol;
        self.auth_key = template.auth_key.clone();
        self.priv_protocol = template.priv_protocol;
        self.priv_key = template.priv_key.clone();
        self.clone_from = Some(key);
        self.keyed = true;
        SetResult::Ok
    }

    fn set_auth_protocol(&mut self, oid: &Oid) -> SetResult {
        let Ok(protocol) = parse_auth_oid(oid) else {
            return SetResult::WrongValue;
        };
        if protocol == self.auth_protocol {
            return SetResult::Ok;
        }
        if protocol.is_some() && self.keyed {
            return SetResult::InconsistentValue;
        }
        if protocol.is_none() && self.priv_protocol.is_some() {
            return SetResult::InconsistentValue;
        }

        self.auth_protocol = protocol;
        if protocol.is_none() {
            self.auth_key = SecretKey::default();
        }
        SetResult::Ok
    }

    fn set_priv_protocol(&mut self, oid: &Oid) -> SetResult {
        let Ok(protocol) = parse_priv_oid(oid) else {
            return SetResult::WrongValue;
        };
        if protocol == self.priv_protocol {
            return SetResult::Ok;
        }
        if protocol.is_some() && (self.keyed || self.auth_protocol.is_none()) {
            return SetResult::InconsistentValue;
        }

        self.priv_protocol = protocol;
        if protocol.is_none() {
            self.priv_key = SecretKey::default();
        }
        SetResult::Ok
    }

    fn change_auth_key(&mut self, value: &[u8]) -> SetResult {
        let Some(protocol) = self.auth_protocol else {
            return SetResult::InconsistentValue;
        };
        match decode_keychange(protocol, &self.auth_key, protocol.digest_len(), value) {
            Ok(key) => {
                self.auth_key = key;
                SetResult::Ok
            }
            Err(e) => key_change_result(e),
        }
    }

    fn change_priv_key(&mut self, value: &[u8]) -> SetResult {
        let (Some(auth), Some(privacy)) = (self.auth_protocol, self.priv_protocol) else {
            return SetResult::InconsistentValue;
        };
        match decode_keychange(auth, &self.priv_key, privacy.key_len(), value) {
            Ok(key) => {
                self.priv_key = key;
                SetResult::Ok
            }
            Err(e) => key_change_result(e),
        }
    }

    fn is_requester(&self, ctx: &ColumnContext<'_, Self>) -> bool {
        ctx.request.security_name == self.key.user_name
    }
}

fn key_change_result(error: KeyChangeError) -> SetResult {
    match error {
        KeyChangeError::WrongLength { .. } => SetResult::WrongLength,
        KeyChangeError::KeyLength { .. } => SetResult::InconsistentValue,
    }
}

impl ConceptualRow for UserEntry {
    type Key = UserKey;

    const TABLE: &'static str = "usmUserTable";
    const ENTRY: &'static [u32] = ENTRY;
    const STATUS_COLUMN: u32 = COL_STATUS;
    const STORAGE_TYPE_COLUMN: u32 = COL_STORAGE_TYPE;

    fn new(key: UserKey) -> Self {
        Self {
            security_name: key.user_name.clone(),
            key,
            clone_from: None,
            keyed: false,
            auth_protocol: None,
            auth_key: SecretKey::default(),
            priv_protocol: None,
            priv_key: SecretKey::default(),
            public: Bytes::new(),
            storage_type: StorageType::NonVolatile,
            status: RowStatus::NotReady,
        }
    }

    fn key(&self) -> &UserKey {
        &self.key
    }

    fn status(&self) -> RowStatus {
        self.status
    }

    fn set_status(&mut self, status: RowStatus) {
        self.status = status;
    }

    fn storage_type(&self) -> StorageType {
        self.storage_type
    }

    fn set_storage_type(&mut self, storage_type: StorageType) {
        self.storage_type = storage_type;
    }

    fn column(column: u32) -> Option<Column> {
        let column = match column {
            COL_ENGINE_ID => Column::not_accessible(ColumnSyntax::OctetString { min: 5, max: 32 }),
            COL_NAME => Column::not_accessible(ColumnSyntax::OctetString { min: 1, max: 32 }),
            COL_SECURITY_NAME => Column::read_only(ColumnSyntax::OctetString { min: 0, max: 255 }),
            COL_CLONE_FROM | COL_AUTH_PROTOCOL | COL_PRIV_PROTOCOL => {
                Column::read_create(ColumnSyntax::ObjectIdentifier)
            }
            COL_AUTH_KEY_CHANGE
            | COL_OWN_AUTH_KEY_CHANGE
            | COL_PRIV_KEY_CHANGE
            | COL_OWN_PRIV_KEY_CHANGE => Column::read_create(KEY_CHANGE),
            COL_PUBLIC => Column::read_create(ColumnSyntax::OctetString { min: 0, max: 32 }),
            COL_STORAGE_TYPE => Column::read_create(ColumnSyntax::Enum(StorageType::VALUES)),
            COL_STATUS => Column::read_create(ColumnSyntax::Enum(RowStatus::WRITABLE)),
            _ => return None,
        };
        Some(column)
    }

    fn validate_key(key: &UserKey) -> bool {
        (5..=32).contains(&key.engine_id.len()) && (1..=32).contains(&key.user_name.len())
    }

    fn is_ready(&self) -> bool {
        self.keyed
    }

    /// Only a user without authentication or privacy may become read-only.
    fn check_storage_type(&self, to: StorageType) -> SetResult {
        if to == StorageType::ReadOnly && to != self.storage_type {
            return if self.auth_protocol.is_none() && self.priv_protocol.is_none() {
                SetResult::Ok
            } else {
                SetResult::InconsistentValue
            };
        }
        self.storage_type.check_transition(to)
    }

    fn set_column(
        &mut self,
        column: u32,
        value: &Value,
        ctx: &ColumnContext<'_, Self>,
    ) -> SetResult {
        match (column, value) {
            (COL_CLONE_FROM, Value::ObjectIdentifier(pointer)) => self.set_clone_from(pointer, ctx),
            (COL_AUTH_PROTOCOL, Value::ObjectIdentifier(oid)) => self.set_auth_protocol(oid),
            (COL_PRIV_PROTOCOL, Value::ObjectIdentifier(oid)) => self.set_priv_protocol(oid),
            (COL_AUTH_KEY_CHANGE, Value::OctetString(v)) => self.change_auth_key(v),
            (COL_PRIV_KEY_CHANGE, Value::OctetString(v)) => self.change_priv_key(v),
            (COL_OWN_AUTH_KEY_CHANGE, Value::OctetString(v)) => {
                if !self.is_requester(ctx) {
                    return SetResult::NoAccess;
                }
                self.change_auth_key(v)
            }
            (COL_OWN_PRIV_KEY_CHANGE, Value::OctetString(v)) => {
                if !self.is_requester(ctx) {
                    return SetResult::NoAccess;
                }
                self.change_priv_key(v)
            }
            (COL_PUBLIC, Value::OctetString(v)) => {
                self.public = v.clone();
                SetResult::Ok
            }
            _ => SetResult::NotWritable,
        }
    }

    fn get_column(&self, column: u32) -> Option<Value> {
        match column {
            COL_SECURITY_NAME => Some(Value::OctetString(self.security_name.clone())),
            // zeroDotZero
            COL_CLONE_FROM => Some(Value::ObjectIdentifier(Oid::from_slice(&[0, 0]))),
            COL_AUTH_PROTOCOL => Some(Value::ObjectIdentifier(auth_oid(self.auth_protocol))),
            COL_PRIV_PROTOCOL => Some(Value::ObjectIdentifier(priv_oid(self.priv_protocol))),
            COL_AUTH_KEY_CHANGE
            | COL_OWN_AUTH_KEY_CHANGE
            | COL_PRIV_KEY_CHANGE
            | COL_OWN_PRIV_KEY_CHANGE => Some(Value::OctetString(Bytes::new())),
            COL_PUBLIC => Some(Value::OctetString(self.public.clone())),
            _ => None,
        }
    }
}

/// Builder for a seeded user.
///
/// Typically used via
/// [`MibTablesBuilder::user()`](crate::agent::MibTablesBuilder::user).
/// Keys are already localized to the engine.
///
/// # Example
///
/// ```rust
/// use snmp_rows::agent::MibTables;
/// use snmp_rows::usm::{AuthProtocol, PrivProtocol};
///
/// let tables = MibTables::builder()
///     .user(&b"\x80\x00\x1f\x88\x04test"[..], "admin", |u| u
///         .auth(AuthProtocol::Sha1, vec![0x11; 20])
///         .privacy(PrivProtocol::Aes128, vec![0x22; 16]))
///     .build()
///     .unwrap();
///
/// let admin = tables.users().scan().next().unwrap();
/// assert_eq!(admin.auth_protocol(), Some(AuthProtocol::Sha1));
/// ```
pub struct UserBuilder {
    key: UserKey,
    security_name: Option<Bytes>,
    auth: Option<(AuthProtocol, SecretKey)>,
    privacy: Option<(PrivProtocol, SecretKey)>,
    public: Bytes,
    storage_type: StorageType,
}

impl UserBuilder {
    pub fn new(engine_id: impl Into<Bytes>, user_name: impl Into<Bytes>) -> Self {
        Self {
            key: UserKey::new(engine_id, user_name),
            security_name: None,
            auth: None,
            privacy: None,
            public: Bytes::new(),
            storage_type: StorageType::Permanent,
        }
    }

    /// Security name, if it differs from the user name.
    pub fn security_name(mut self, name: impl Into<Bytes>) -> Self {
        self.security_name = Some(name.into());
        self
    }

    pub fn auth(mut self, protocol: AuthProtocol, key: impl Into<Vec<u8>>) -> Self {
        self.auth = Some((protocol, SecretKey::new(key)));
        self
    }

    /// Privacy protocol and key. Ignored unless [`auth`](Self::auth) is set.
    pub fn privacy(mut self, protocol: PrivProtocol, key: impl Into<Vec<u8>>) -> Self {
        self.privacy = Some((protocol, SecretKey::new(key)));
        self
    }

    pub fn public(mut self, public: impl Into<Bytes>) -> Self {
        self.public = public.into();
        self
    }

    /// Storage type of the seeded row. Default is `permanent`.
    pub fn storage_type(mut self, storage_type: StorageType) -> Self {
        self.storage_type = storage_type;
        self
    }

    /// Build the active row.
    pub fn build(self) -> UserEntry {
        let (auth_protocol, auth_key) = match self.auth {
            Some((protocol, key)) => (Some(protocol), key),
            None => (None, SecretKey::default()),
        };
        let (priv_protocol, priv_key) = match self.privacy.filter(|_| auth_protocol.is_some()) {
            Some((protocol, key)) => (Some(protocol), key),
            None => (None, SecretKey::default()),
        };

        UserEntry {
            security_name: self
                .security_name
                .unwrap_or_else(|| self.key.user_name.clone()),
            key: self.key,
            clone_from: None,
            keyed: true,
            auth_protocol,
            auth_key,
            priv_protocol,
            priv_key,
            public: self.public,
            storage_type: self.storage_type,
            status: RowStatus::Active,
        }
    }
}
