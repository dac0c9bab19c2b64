//! Fuzz target for suppression regex-format parsing.
//!
//! Goal: validation should **never panic** on any `/pattern/flags` payload.
//! Invalid formats and uncompilable patterns must come back as errors.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_suppression_regex
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use stackguard_suppressions::{AppliesTo, Suppression, validate};

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        // Keep patterns small so compilation stays fast.
        if raw.len() > 512 {
            return;
        }
        let suppression = Suppression::new("Pack-Rule1", "fuzzed suppression reason")
            .applies_to(vec![AppliesTo::Regex {
                regex: raw.to_string(),
            }]);

        // Should never panic; format errors are fine.
        let _ = validate(std::slice::from_ref(&suppression));
    }
});
