//! Property tests for table index encoding.

use bytes::Bytes;
use proptest::prelude::*;
use snmp_rows::Oid;
use snmp_rows::index::{self, IndexComponent, IndexKind, RowKey};
use snmp_rows::usm::UserKey;
use snmp_rows::vacm::{AccessKey, GroupKey, SecurityLevel, SecurityModel, ViewKey};

fn octets(max: usize) -> impl Strategy<Value = Bytes> {
    prop::collection::vec(any::<u8>(), 0..=max).prop_map(Bytes::from)
}

fn subtree() -> impl Strategy<Value = Oid> {
    prop::collection::vec(any::<u32>(), 0..=20).prop_map(|arcs| Oid::from_slice(&arcs))
}

fn security_model() -> impl Strategy<Value = SecurityModel> {
    prop_oneof![
        Just(SecurityModel::V1),
        Just(SecurityModel::V2c),
        Just(SecurityModel::Usm),
    ]
}

fn security_level() -> impl Strategy<Value = SecurityLevel> {
    prop_oneof![
        Just(SecurityLevel::NoAuthNoPriv),
        Just(SecurityLevel::AuthNoPriv),
        Just(SecurityLevel::AuthPriv),
    ]
}

proptest! {
    #[test]
    fn group_key_roundtrip(model in security_model(), name in octets(32)) {
        let key = GroupKey { security_model: model, security_name: name };
        prop_assert_eq!(GroupKey::from_index(key.to_index().arcs()).unwrap(), key);
    }

    #[test]
    fn access_key_roundtrip(
        group in octets(32),
        prefix in octets(32),
        level in security_level(),
    ) {
        let key = AccessKey {
            group_name: group,
            context_prefix: prefix,
            security_model: SecurityModel::Any,
            security_level: level,
        };
        prop_assert_eq!(AccessKey::from_index(key.to_index().arcs()).unwrap(), key);
    }

    #[test]
    fn view_key_roundtrip(name in octets(32), subtree in subtree()) {
        let key = ViewKey::new(name, subtree);
        prop_assert_eq!(ViewKey::from_index(key.to_index().arcs()).unwrap(), key);
    }

    #[test]
    fn user_key_roundtrip(engine in octets(32), name in octets(32)) {
        let key = UserKey::new(engine, name);
        prop_assert_eq!(UserKey::from_index(key.to_index().arcs()).unwrap(), key);
    }

    #[test]
    fn key_order_matches_component_order(
        a in (security_model(), octets(8)),
        b in (security_model(), octets(8)),
    ) {
        let a = GroupKey::new(a.0, a.1);
        let b = GroupKey::new(b.0, b.1);
        prop_assert_eq!(a.cmp(&b), a.components().cmp(&b.components()));
    }

    #[test]
    fn decode_arbitrary_arcs_never_panics(arcs in prop::collection::vec(0u32..300, 0..40)) {
        let schema = [IndexKind::OctetString, IndexKind::ObjectIdentifier];
        let _ = index::decode(&schema, &arcs);
        let _ = index::decode_partial(&schema, &arcs);
    }

    #[test]
    fn partial_decode_of_full_index_is_full_key(model in security_model(), name in octets(16)) {
        let key = GroupKey::new(model, name);
        let partial = index::decode_partial(GroupKey::SCHEMA, key.to_index().arcs()).unwrap();
        prop_assert_eq!(partial, key.components());
    }

    #[test]
    fn truncated_string_decodes_as_prefix(name in octets(16), cut in 0usize..16) {
        let suffix = index::encode(&[IndexComponent::OctetString(name.clone())]);
        let arcs = &suffix.arcs()[..suffix.len().min(cut + 1)];

        let partial = index::decode_partial(&[IndexKind::OctetString], arcs).unwrap();
        match partial.as_slice() {
            [] => prop_assert!(arcs.is_empty()),
            [IndexComponent::OctetString(got)] => prop_assert!(name.starts_with(got)),
            other => prop_assert!(false, "unexpected components {:?}", other),
        }
    }
}
