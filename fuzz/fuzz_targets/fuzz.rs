#![no_main]

use libfuzzer_sys::fuzz_target;
use lzf::{decode, encode};

/// Verifies that the decoder safely handles arbitrary, potentially malformed input.
///
/// This simulates scenarios involving corrupted files, malicious payloads, or random noise.
///
/// # Invariant
/// The decoder must return either `Ok(_)` or `Err(_)`. It must **never** panic
/// or cause memory safety violations (segfaults), regardless of the input data.
fn verify_decode_robustness(data: &[u8]) {
    // We explicitly ignore the result. Whether it succeeds (coincidentally valid)
    // or fails (invalid data) is irrelevant; we only assert that it returns safely.
    let _ = decode(data);
}

/// Verifies the lossless "Round-Trip" property of the codec.
///
/// # Invariant
/// `decode(encode(data)) == data`
///
/// If this invariant fails, it implies one of three critical issues:
/// 1. The encoder discarded information.
/// 2. The decoder corrupted the restored data.
/// 3. The encoder produced output that the decoder rejects as invalid.
///
/// # Panics
/// This function panics if the decoded output does not bit-match the input,
/// or if decoding returns an error. These panics signal a fuzzing failure.
fn verify_round_trip(data: &[u8]) {
    let framed = encode(data);

    match decode(&framed) {
        Ok(restored) => {
            if restored != data {
                panic!(
                    "Round-trip mismatch!\nInput len: {}\nFramed len: {}\nDecoded len: {}",
                    data.len(),
                    framed.len(),
                    restored.len()
                );
            }
        }
        Err(e) => {
            panic!(
                "Round-trip failed! Decoder rejected valid framed data.\nError: {:?}\nInput len: {}",
                e,
                data.len()
            );
        }
    }
}

fuzz_target!(|data: &[u8]| {
    // 1. Robustness: Ensure random noise doesn't crash the decoder.
    verify_decode_robustness(data);

    // 2. Correctness: Ensure valid data survives an encode-decode cycle.
    verify_round_trip(data);
});
