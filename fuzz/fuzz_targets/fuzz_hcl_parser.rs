//! Fuzz target for Terraform parsing and module context construction.
//!
//! Goal: the adapter should **never panic** on any input. Syntax errors are fine.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_hcl_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Terraform files are UTF-8.
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = ociguard_hcl::fuzz::parse_terraform(text);
    }
});
