#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;

use snmp_rows::prelude::*;

const ENTRIES: [&[u32]; 4] = [
    &[1, 3, 6, 1, 6, 3, 15, 1, 2, 2, 1],
    &[1, 3, 6, 1, 6, 3, 16, 1, 2, 1],
    &[1, 3, 6, 1, 6, 3, 16, 1, 4, 1],
    &[1, 3, 6, 1, 6, 3, 16, 1, 5, 2, 1],
];

fn tables() -> MibTables {
    MibTables::builder()
        .user(&b"\x80\x00\x1f\x88\x04fuzz"[..], "a", |u| {
            u.auth(AuthProtocol::Sha1, [1u8; 20])
                .privacy(PrivProtocol::Aes128, [2u8; 16])
                .storage_type(StorageType::NonVolatile)
        })
        .group("a", SecurityModel::Usm, "g")
        .view("v", |v| v.include(oid!(1, 3, 6, 1)))
        .build()
        .unwrap()
}

/// Each varbind: table, column, index length, index bytes, value tag, value bytes.
fn varbinds(mut data: &[u8]) -> Vec<VarBind> {
    let mut out = Vec::new();
    while let [table, column, len, rest @ ..] = data {
        let len = usize::from(*len % 24).min(rest.len());
        let (index, rest) = rest.split_at(len);
        let Some((tag, rest)) = rest.split_first() else {
            break;
        };
        let vlen = rest.first().map_or(0, |b| usize::from(b % 24)).min(rest.len());
        let (raw, rest) = rest.split_at(vlen);

        let entry = Oid::from_slice(ENTRIES[usize::from(table % 4)]);
        let index: Vec<u32> = index.iter().map(|&b| u32::from(b)).collect();
        let oid = entry.child(u32::from(column % 15)).join(&index);
        let value = match tag % 3 {
            0 => Value::Integer(i32::from(raw.first().copied().unwrap_or(0) % 8)),
            1 => Value::OctetString(Bytes::copy_from_slice(raw)),
            _ => Value::ObjectIdentifier(Oid::from_slice(
                &raw.iter().map(|&b| u32::from(b)).collect::<Vec<_>>(),
            )),
        };
        out.push(VarBind::new(oid, value));
        data = rest;
    }
    out
}

fuzz_target!(|data: &[u8]| {
    let mut tables = tables();
    let before = format!("{tables:?}");
    let varbinds = varbinds(data);
    let ctx = RequestContext::usm("a", SecurityLevel::AuthPriv);

    let response = tables.set(&ctx, &varbinds);
    assert_eq!(response.varbinds, varbinds);
    if response.error_status != ErrorStatus::NoError {
        // A failed PDU leaves no trace
        assert_eq!(format!("{tables:?}"), before);
        assert!(response.error_index >= 1);
        assert!(response.error_index as usize <= varbinds.len());
    }
});
