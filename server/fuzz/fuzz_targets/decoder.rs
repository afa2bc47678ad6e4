#![no_main]

use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;

use smfi_server::fuzzing::fuzz_parse;

fuzz_target!(|data: &[u8]| {
    let _decoded = fuzz_parse(BytesMut::from(data));
});
