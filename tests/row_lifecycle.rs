//! RowStatus lifecycle driven through SET PDUs.

mod common;

use common::*;
use snmp_rows::agent::MibTables;
use snmp_rows::handler::GetResult;
use snmp_rows::row::{ConceptualRow, RowStatus, StorageType};
use snmp_rows::vacm::{GroupKey, SecurityModel, ViewKey};
use snmp_rows::{ErrorStatus, Value, oid};

const GROUP_NAME: u32 = 3;
const GROUP_STORAGE: u32 = 4;
const GROUP_STATUS: u32 = 5;

fn alice() -> GroupKey {
    GroupKey::new(SecurityModel::Usm, "alice")
}

fn status_of(tables: &MibTables, key: &GroupKey) -> Option<RowStatus> {
    tables.groups().get_exact(key).map(|r| r.status())
}

#[test]
fn create_and_go_without_mandatory_column_fails() {
    init_tracing();
    let mut tables = MibTables::new();

    let response = tables.set(
        &admin(),
        &[int(
            group_column(GROUP_STATUS, SecurityModel::Usm, "alice"),
            CREATE_AND_GO,
        )],
    );

    assert_eq!(response.error_status, ErrorStatus::InconsistentValue);
    assert_eq!(response.error_index, 1);
    assert!(tables.groups().get(&alice()).is_none());
}

#[test]
fn create_and_wait_with_column_in_same_pdu() {
    let mut tables = MibTables::new();

    let response = tables.set(
        &admin(),
        &[
            string(group_column(GROUP_NAME, SecurityModel::Usm, "alice"), "g1"),
            int(
                group_column(GROUP_STATUS, SecurityModel::Usm, "alice"),
                CREATE_AND_WAIT,
            ),
        ],
    );

    assert_eq!(response.error_status, ErrorStatus::NoError);
    let row = tables.groups().get_exact(&alice()).unwrap();
    assert_eq!(row.status(), RowStatus::NotInService);
    assert_eq!(&row.group_name[..], b"g1");
    assert_eq!(row.storage_type(), StorageType::NonVolatile);
}

#[test]
fn destroy_permanent_row_is_wrong_value() {
    let mut tables = seeded_tables();
    let key = GroupKey::new(SecurityModel::Usm, "admin");
    let before = tables.groups().get_exact(&key).cloned();

    let response = tables.set(
        &admin(),
        &[int(group_column(GROUP_STATUS, SecurityModel::Usm, "admin"), DESTROY)],
    );

    assert_eq!(response.error_status, ErrorStatus::WrongValue);
    assert_eq!(tables.groups().get_exact(&key).cloned(), before);
}

#[test]
fn scan_follows_key_field_order() {
    let tables = MibTables::builder()
        .group("bob", SecurityModel::V1, "g")
        .group("alice", SecurityModel::V1, "g")
        .group("adam", SecurityModel::V2c, "g")
        .build()
        .unwrap();

    let names: Vec<_> = tables
        .groups()
        .scan()
        .map(|r| String::from_utf8_lossy(&r.key().security_name).into_owned())
        .collect();
    assert_eq!(names, ["alice", "bob", "adam"]);
}

#[test]
fn not_ready_row_cannot_activate_until_complete() {
    let mut tables = MibTables::new();
    let status = group_column(GROUP_STATUS, SecurityModel::Usm, "alice");

    let response = tables.set(&admin(), &[int(status.clone(), CREATE_AND_WAIT)]);
    assert_eq!(response.error_status, ErrorStatus::NoError);
    assert_eq!(status_of(&tables, &alice()), Some(RowStatus::NotReady));

    for intent in [ACTIVE, NOT_IN_SERVICE] {
        let response = tables.set(&admin(), &[int(status.clone(), intent)]);
        assert_eq!(response.error_status, ErrorStatus::InconsistentValue);
        assert_eq!(status_of(&tables, &alice()), Some(RowStatus::NotReady));
    }

    // Writing the missing column promotes the row
    let response = tables.set(
        &admin(),
        &[string(group_column(GROUP_NAME, SecurityModel::Usm, "alice"), "g1")],
    );
    assert_eq!(response.error_status, ErrorStatus::NoError);
    assert_eq!(status_of(&tables, &alice()), Some(RowStatus::NotInService));

    let response = tables.set(&admin(), &[int(status, ACTIVE)]);
    assert_eq!(response.error_status, ErrorStatus::NoError);
    assert_eq!(status_of(&tables, &alice()), Some(RowStatus::Active));
}

#[test]
fn setting_current_status_is_noop() {
    let mut tables = seeded_tables();
    let key = GroupKey::new(SecurityModel::Usm, "admin");
    let before = tables.groups().get_exact(&key).cloned();

    let response = tables.set(
        &admin(),
        &[int(group_column(GROUP_STATUS, SecurityModel::Usm, "admin"), ACTIVE)],
    );

    assert_eq!(response.error_status, ErrorStatus::NoError);
    assert_eq!(tables.groups().get_exact(&key).cloned(), before);
}

#[test]
fn active_and_not_in_service_toggle() {
    let mut tables = MibTables::new();
    let status = group_column(GROUP_STATUS, SecurityModel::Usm, "alice");
    tables.set(
        &admin(),
        &[
            int(status.clone(), CREATE_AND_GO),
            string(group_column(GROUP_NAME, SecurityModel::Usm, "alice"), "g1"),
        ],
    );
    assert_eq!(status_of(&tables, &alice()), Some(RowStatus::Active));

    tables.set(&admin(), &[int(status.clone(), NOT_IN_SERVICE)]);
    assert_eq!(status_of(&tables, &alice()), Some(RowStatus::NotInService));

    tables.set(&admin(), &[int(status, ACTIVE)]);
    assert_eq!(status_of(&tables, &alice()), Some(RowStatus::Active));
}

#[test]
fn destroy_removes_row() {
    let mut tables = MibTables::new();
    let status = group_column(GROUP_STATUS, SecurityModel::V2c, "public");
    tables.set(
        &admin(),
        &[
            int(status.clone(), CREATE_AND_GO),
            string(group_column(GROUP_NAME, SecurityModel::V2c, "public"), "readers"),
        ],
    );
    assert_eq!(tables.groups().len(), 1);

    let response = tables.set(&admin(), &[int(status.clone(), DESTROY)]);
    assert_eq!(response.error_status, ErrorStatus::NoError);
    assert!(tables.groups().is_empty());

    // Destroying a row that does not exist
    let response = tables.set(&admin(), &[int(status, DESTROY)]);
    assert_eq!(response.error_status, ErrorStatus::InconsistentValue);
}

#[test]
fn create_on_existing_row_is_inconsistent() {
    let mut tables = seeded_tables();
    let response = tables.set(
        &admin(),
        &[int(
            group_column(GROUP_STATUS, SecurityModel::Usm, "admin"),
            CREATE_AND_GO,
        )],
    );
    assert_eq!(response.error_status, ErrorStatus::InconsistentValue);
}

#[test]
fn column_write_without_row_is_inconsistent_name() {
    let mut tables = MibTables::new();
    let response = tables.set(
        &admin(),
        &[string(group_column(GROUP_NAME, SecurityModel::Usm, "ghost"), "g1")],
    );
    assert_eq!(response.error_status, ErrorStatus::InconsistentName);
    assert!(tables.groups().get(&GroupKey::new(SecurityModel::Usm, "ghost")).is_none());
}

#[test]
fn oversized_key_is_no_creation() {
    let mut tables = MibTables::new();
    let long_name = "x".repeat(33);
    let response = tables.set(
        &admin(),
        &[int(
            group_column(GROUP_STATUS, SecurityModel::Usm, &long_name),
            CREATE_AND_WAIT,
        )],
    );
    assert_eq!(response.error_status, ErrorStatus::NoCreation);
}

#[test]
fn unknown_column_is_no_creation() {
    let mut tables = MibTables::new();
    let response = tables.set(
        &admin(),
        &[int(group_column(9, SecurityModel::Usm, "alice"), 1)],
    );
    assert_eq!(response.error_status, ErrorStatus::NoCreation);
}

#[test]
fn malformed_index_is_inconsistent_name() {
    let mut tables = MibTables::new();
    // Declared length 9, only 2 bytes follow
    let status = column(&group_entry(), GROUP_STATUS, &[3, 9, 97, 98]);
    let response = tables.set(&admin(), &[int(status, CREATE_AND_WAIT)]);
    assert_eq!(response.error_status, ErrorStatus::InconsistentName);

    // Byte sub-identifier above 255
    let status = column(&group_entry(), GROUP_STATUS, &[3, 1, 256]);
    let response = tables.set(&admin(), &[int(status, CREATE_AND_WAIT)]);
    assert_eq!(response.error_status, ErrorStatus::InconsistentName);
    assert!(tables.groups().is_empty());
}

#[test]
fn intent_values_outside_range() {
    let mut tables = MibTables::new();
    let status = group_column(GROUP_STATUS, SecurityModel::Usm, "alice");

    // notReady is never writable; 7 is not a RowStatus
    for value in [NOT_READY, 0, 7] {
        let response = tables.set(&admin(), &[int(status.clone(), value)]);
        assert_eq!(response.error_status, ErrorStatus::WrongValue, "value {value}");
    }
}

#[test]
fn storage_type_conversions() {
    let mut tables = MibTables::new();
    let storage = group_column(GROUP_STORAGE, SecurityModel::Usm, "alice");
    tables.set(
        &admin(),
        &[
            int(group_column(GROUP_STATUS, SecurityModel::Usm, "alice"), CREATE_AND_GO),
            string(group_column(GROUP_NAME, SecurityModel::Usm, "alice"), "g1"),
        ],
    );

    let response = tables.set(&admin(), &[int(storage.clone(), StorageType::Volatile.as_i32())]);
    assert_eq!(response.error_status, ErrorStatus::NoError);

    for to in [StorageType::Permanent, StorageType::ReadOnly, StorageType::Other] {
        let response = tables.set(&admin(), &[int(storage.clone(), to.as_i32())]);
        assert_eq!(response.error_status, ErrorStatus::InconsistentValue, "{to}");
    }
    assert_eq!(
        tables.groups().get_exact(&alice()).unwrap().storage_type(),
        StorageType::Volatile
    );
}

#[test]
fn read_only_row_rejects_changes() {
    let mut tables = MibTables::builder()
        .view("ro", |v| {
            v.include(oid!(1, 3, 6, 1))
                .storage_type(StorageType::ReadOnly)
        })
        .build()
        .unwrap();
    let mut index = string_index(b"ro");
    index.extend([4, 1, 3, 6, 1]);

    // vacmViewTreeFamilyType
    let response = tables.set(&admin(), &[int(column(&view_entry(), 4, &index), 2)]);
    assert_eq!(response.error_status, ErrorStatus::WrongValue);

    // Rewriting the current status changes nothing and is accepted
    let response = tables.set(&admin(), &[int(column(&view_entry(), 6, &index), ACTIVE)]);
    assert_eq!(response.error_status, ErrorStatus::NoError);

    for intent in [NOT_IN_SERVICE, DESTROY] {
        let response = tables.set(&admin(), &[int(column(&view_entry(), 6, &index), intent)]);
        assert_eq!(response.error_status, ErrorStatus::WrongValue, "{intent}");
    }
    let key = ViewKey::new("ro", oid!(1, 3, 6, 1));
    assert_eq!(tables.views().get_exact(&key).unwrap().status(), RowStatus::Active);

    assert_eq!(tables.views().len(), 1);
}

#[test]
fn failure_in_one_table_rolls_back_all_tables() {
    let mut tables = seeded_tables();
    let users_before = tables.users().scan().cloned().collect::<Vec<_>>();
    let groups_before = tables.groups().scan().cloned().collect::<Vec<_>>();

    let mut view_index = string_index(b"new");
    view_index.extend([2, 1, 3]);

    let response = tables.set(
        &admin(),
        &[
            int(user_column(13, "carol"), CREATE_AND_WAIT),
            string(user_column(11, "templateMD5"), "changed"),
            int(group_column(GROUP_STATUS, SecurityModel::Usm, "carol"), CREATE_AND_WAIT),
            string(group_column(GROUP_NAME, SecurityModel::Usm, "carol"), "admins"),
            int(column(&view_entry(), 6, &view_index), CREATE_AND_GO),
            // Fails at ACTION: row stays notReady
            int(user_column(13, "dave"), CREATE_AND_GO),
        ],
    );

    assert_eq!(response.error_status, ErrorStatus::InconsistentValue);
    assert_eq!(response.error_index, 6);
    assert_eq!(tables.users().scan().cloned().collect::<Vec<_>>(), users_before);
    assert_eq!(tables.groups().scan().cloned().collect::<Vec<_>>(), groups_before);
    assert!(tables.views().get(&ViewKey::new("new", oid!(1, 3))).is_none());
}

#[test]
fn view_created_with_defaults() {
    let mut tables = MibTables::new();
    let mut index = string_index(b"sys");
    index.extend([7, 1, 3, 6, 1, 2, 1, 1]);

    let response = tables.set(
        &admin(),
        &[
            int(column(&view_entry(), 6, &index), CREATE_AND_GO),
            string(column(&view_entry(), 3, &index), [0xFF]),
        ],
    );
    assert_eq!(response.error_status, ErrorStatus::NoError);

    let row = tables
        .views()
        .get_exact(&ViewKey::new("sys", oid!(1, 3, 6, 1, 2, 1, 1)))
        .unwrap();
    assert_eq!(row.status(), RowStatus::Active);
    assert_eq!(&row.mask[..], &[0xFF]);
}

#[test]
fn access_row_created_and_read_back() {
    let mut tables = MibTables::new();
    let mut index = string_index(b"ops");
    index.extend(string_index(b""));
    index.extend([3, 2]);

    let response = tables.set(
        &admin(),
        &[
            int(column(&access_entry(), 9, &index), CREATE_AND_GO),
            string(column(&access_entry(), 5, &index), "all"),
            int(column(&access_entry(), 4, &index), 2),
        ],
    );
    assert_eq!(response.error_status, ErrorStatus::NoError);

    assert_eq!(
        tables.get(&column(&access_entry(), 5, &index)),
        GetResult::Value(Value::from("all"))
    );
    assert_eq!(
        tables.get(&column(&access_entry(), 4, &index)),
        GetResult::Value(Value::Integer(2))
    );
    // securityLevel 4 does not decode
    let mut bad = index.clone();
    *bad.last_mut().unwrap() = 4;
    assert_eq!(
        tables.get(&column(&access_entry(), 5, &bad)),
        GetResult::NoSuchInstance
    );
}

#[test]
fn get_next_walks_visible_rows() {
    let tables = seeded_tables();
    let mut oid = group_entry();
    let mut seen = Vec::new();

    while let Some(vb) = tables.get_next(&oid).unwrap().into_option() {
        if !vb.oid.starts_with(&group_entry()) {
            break;
        }
        seen.push(vb.to_string());
        oid = vb.oid;
    }

    assert_eq!(
        seen,
        [
            "1.3.6.1.6.3.16.1.2.1.3.3.5.97.100.109.105.110 = admins",
            "1.3.6.1.6.3.16.1.2.1.4.3.5.97.100.109.105.110 = 4",
            "1.3.6.1.6.3.16.1.2.1.5.3.5.97.100.109.105.110 = 1",
        ]
    );
}

#[test]
fn row_limit_refuses_creation() {
    let mut tables = MibTables::builder()
        .group("admin", SecurityModel::Usm, "admins")
        .max_rows(2)
        .build()
        .unwrap();
    let create = |name: &str| {
        [
            int(group_column(GROUP_STATUS, SecurityModel::Usm, name), CREATE_AND_GO),
            string(group_column(GROUP_NAME, SecurityModel::Usm, name), "ops"),
        ]
    };

    assert_eq!(tables.set(&admin(), &create("alice")).error_status, ErrorStatus::NoError);

    let response = tables.set(&admin(), &create("bob"));
    assert_eq!(response.error_status, ErrorStatus::ResourceUnavailable);
    assert_eq!(response.error_index, 1);
    assert_eq!(tables.groups().len(), 2);

    // Destroying a row frees its slot
    let response = tables.set(
        &admin(),
        &[int(group_column(GROUP_STATUS, SecurityModel::Usm, "alice"), DESTROY)],
    );
    assert_eq!(response.error_status, ErrorStatus::NoError);
    assert_eq!(tables.set(&admin(), &create("bob")).error_status, ErrorStatus::NoError);
}
