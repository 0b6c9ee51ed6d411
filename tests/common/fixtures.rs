//! Common test fixtures and constants.

use snmp_rows::agent::MibTables;
use snmp_rows::handler::RequestContext;
use snmp_rows::usm::{AuthProtocol, PrivProtocol};
use snmp_rows::vacm::{SecurityLevel, SecurityModel};
use snmp_rows::{Oid, Value, VarBind, oid};

// =============================================================================
// Table entry OIDs
// =============================================================================

/// usmUserEntry: 1.3.6.1.6.3.15.1.2.2.1
pub fn user_entry() -> Oid {
    oid!(1, 3, 6, 1, 6, 3, 15, 1, 2, 2, 1)
}

/// vacmSecurityToGroupEntry: 1.3.6.1.6.3.16.1.2.1
pub fn group_entry() -> Oid {
    oid!(1, 3, 6, 1, 6, 3, 16, 1, 2, 1)
}

/// vacmAccessEntry: 1.3.6.1.6.3.16.1.4.1
pub fn access_entry() -> Oid {
    oid!(1, 3, 6, 1, 6, 3, 16, 1, 4, 1)
}

/// vacmViewTreeFamilyEntry: 1.3.6.1.6.3.16.1.5.2.1
pub fn view_entry() -> Oid {
    oid!(1, 3, 6, 1, 6, 3, 16, 1, 5, 2, 1)
}

// =============================================================================
// RowStatus values
// =============================================================================

pub const ACTIVE: i32 = 1;
pub const NOT_IN_SERVICE: i32 = 2;
pub const NOT_READY: i32 = 3;
pub const CREATE_AND_GO: i32 = 4;
pub const CREATE_AND_WAIT: i32 = 5;
pub const DESTROY: i32 = 6;

// =============================================================================
// Instance identifiers
// =============================================================================

/// Length-prefixed octet string index component.
pub fn string_index(s: &[u8]) -> Vec<u32> {
    let mut arcs = Vec::with_capacity(s.len() + 1);
    arcs.push(s.len() as u32);
    arcs.extend(s.iter().map(|&b| u32::from(b)));
    arcs
}

/// Instance suffix of a group row: securityModel, securityName.
pub fn group_index(model: SecurityModel, name: &str) -> Vec<u32> {
    let mut arcs = vec![model.as_u32()];
    arcs.extend(string_index(name.as_bytes()));
    arcs
}

/// Instance suffix of a user row: engineID, userName.
pub fn user_index(name: &str) -> Vec<u32> {
    let mut arcs = string_index(ENGINE_ID);
    arcs.extend(string_index(name.as_bytes()));
    arcs
}

/// `entry.column.index`
pub fn column(entry: &Oid, column: u32, index: &[u32]) -> Oid {
    entry.child(column).join(index)
}

pub fn group_column(col: u32, model: SecurityModel, name: &str) -> Oid {
    column(&group_entry(), col, &group_index(model, name))
}

pub fn user_column(col: u32, name: &str) -> Oid {
    column(&user_entry(), col, &user_index(name))
}

pub fn int(oid: Oid, v: i32) -> VarBind {
    VarBind::new(oid, Value::Integer(v))
}

pub fn string(oid: Oid, v: impl AsRef<[u8]>) -> VarBind {
    VarBind::new(oid, Value::OctetString(v.as_ref().to_vec().into()))
}

pub fn object(oid: Oid, v: Oid) -> VarBind {
    VarBind::new(oid, Value::ObjectIdentifier(v))
}

// =============================================================================
// Seeded configuration
// =============================================================================

/// snmpEngineID of the agent under test.
pub const ENGINE_ID: &[u8] = b"\x80\x00\x1f\x88\x04rows";

/// Localized keys of the template users.
pub const MD5_AUTH_KEY: [u8; 16] = [0xA1; 16];
pub const DES_PRIV_KEY: [u8; 16] = [0xB2; 16];

/// Tables with two template users, a permanent group and a view.
///
/// - `templateMD5`: MD5 auth, DES privacy, nonVolatile
/// - `templateNone`: no auth, no privacy
/// - group (USM, "admin") -> "admins", permanent
pub fn seeded_tables() -> MibTables {
    MibTables::builder()
        .user(ENGINE_ID, "templateMD5", |u| {
            u.auth(AuthProtocol::Md5, MD5_AUTH_KEY)
                .privacy(PrivProtocol::Des, DES_PRIV_KEY)
                .storage_type(snmp_rows::row::StorageType::NonVolatile)
        })
        .user(ENGINE_ID, "templateNone", |u| u)
        .group("admin", SecurityModel::Usm, "admins")
        .access("admins", |a| {
            a.security_model(SecurityModel::Usm)
                .security_level(SecurityLevel::AuthPriv)
                .read_view("all")
                .write_view("all")
        })
        .view("all", |v| v.include(oid!(1, 3, 6, 1)))
        .build()
        .expect("seed configuration")
}

/// Request context of the USM user "admin" at authPriv.
pub fn admin() -> RequestContext {
    RequestContext::usm("admin", SecurityLevel::AuthPriv)
}

/// Install a fmt subscriber honouring `RUST_LOG`, once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
