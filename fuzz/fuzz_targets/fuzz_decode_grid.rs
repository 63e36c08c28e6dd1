#![no_main]
use beatcode::coder::decode_grid;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // Byte 0: step count in bars of four (1-64)
    let step_count = (usize::from(data[0]) % 64 + 1) * 4;

    let grid = decode_grid(&data[1..], step_count);
    assert_eq!(grid.step_count(), step_count);
});
