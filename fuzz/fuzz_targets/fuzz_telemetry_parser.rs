//! Fuzz target for the telemetry stream decoder.
//!
//! Telemetry files come from disk and may be truncated or corrupt; decoding
//! must return an error rather than panic or over-allocate.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tlm_telemetry::{parse_telemetry, DecimatingProcessor, ParserOptions};

fuzz_target!(|data: &[u8]| {
    // Prefix a valid header so the fuzzer spends its time in the command loop.
    let mut stream = Vec::with_capacity(data.len() + 8);
    stream.extend_from_slice(&2u32.to_le_bytes());
    stream.extend_from_slice(&8u32.to_le_bytes());
    stream.extend_from_slice(data);

    let options = ParserOptions::new().with_processor(DecimatingProcessor::new(16, true));
    let _ = parse_telemetry(&stream, &options);

    // Raw input as well, to cover header handling.
    let _ = parse_telemetry(data, &ParserOptions::default());
});
