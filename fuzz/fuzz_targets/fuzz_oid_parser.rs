#![no_main]

use libfuzzer_sys::fuzz_target;

use snmp_rows::oid::Oid;

fuzz_target!(|data: &[u8]| {
    // Fuzz OID from dotted string notation (if data is valid UTF-8)
    if let Ok(s) = std::str::from_utf8(data)
        && let Ok(oid) = Oid::parse(s)
    {
        assert_eq!(Oid::parse(&oid.to_string()).ok(), Some(oid));
    }
});
