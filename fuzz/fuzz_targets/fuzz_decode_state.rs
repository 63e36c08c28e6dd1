#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Fragments are text; lossy conversion still reaches every format.
    let fragment = String::from_utf8_lossy(data);
    let _ = beatcode::decode_state(&fragment);
});
