#![no_main]

use libfuzzer_sys::fuzz_target;

use snmp_rows::index::{self, RowKey};
use snmp_rows::usm::UserKey;
use snmp_rows::vacm::{AccessKey, GroupKey, ViewKey};

fn arcs(data: &[u8]) -> Vec<u32> {
    // Small arcs most of the time so length prefixes line up
    data.chunks(2)
        .map(|c| match c {
            [hi, lo] if hi & 0x80 != 0 => u32::from_be_bytes([*hi, *lo, *hi, *lo]),
            [_, lo] | [lo] => u32::from(*lo),
            _ => 0,
        })
        .collect()
}

fn roundtrip<K: RowKey + PartialEq + std::fmt::Debug>(arcs: &[u32]) {
    let _ = index::decode_partial(K::SCHEMA, arcs);
    if let Ok(key) = K::from_index(arcs) {
        assert_eq!(key.to_index().arcs(), arcs);
    }
}

fuzz_target!(|data: &[u8]| {
    let arcs = arcs(data);
    roundtrip::<GroupKey>(&arcs);
    roundtrip::<AccessKey>(&arcs);
    roundtrip::<ViewKey>(&arcs);
    roundtrip::<UserKey>(&arcs);
});
