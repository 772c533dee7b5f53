//! Fuzz target: Transaction JSON deserialization
//!
//! Feeds arbitrary bytes to serde_json to detect panics, stack overflows,
//! or unexpected behavior in Transaction deserialization.
//!
//! Run: cargo +nightly fuzz run fuzz_transaction_deserialize -- -max_len=4096

#![no_main]
use libfuzzer_sys::fuzz_target;
use synapse_core::Transaction;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _: Result<Transaction, _> = serde_json::from_str(s);
    }

    let _: Result<Transaction, _> = serde_json::from_slice(data);
});
