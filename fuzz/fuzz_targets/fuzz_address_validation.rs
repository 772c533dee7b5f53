//! Fuzz target: address validation and derivation
//!
//! Feeds arbitrary strings to validate_address() and arbitrary bytes to
//! public_key_to_address() to ensure:
//! 1. No panics on any input
//! 2. Every derived address passes its own validation
//!
//! Run: cargo +nightly fuzz run fuzz_address_validation -- -max_len=256

#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = synapse_crypto::validate_address(s);
        let _ = synapse_crypto::normalize_address(s);
    }

    if !data.is_empty() {
        if let Ok(addr) = synapse_crypto::public_key_to_address(data) {
            assert!(
                synapse_crypto::validate_address(&addr),
                "derived address must pass validation: {}",
                addr
            );
        }
    }
});
