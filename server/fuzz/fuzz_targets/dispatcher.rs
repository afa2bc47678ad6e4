#![no_main]

use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;

use smfi_server::fuzzing::fuzz_dispatch;

fuzz_target!(|data: &[u8]| {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("Failed building runtime");
    let _outcome = runtime.block_on(fuzz_dispatch(BytesMut::from(data)));
});
