//! Fuzz target for `exclude` glob compilation and matching.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_exclude_globs
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct ExcludeInput {
    /// Exclude patterns (e.g. "modules/vendored/**")
    patterns: Vec<String>,
    /// Repo-relative `.tf` paths to match against
    candidates: Vec<String>,
}

fuzz_target!(|input: ExcludeInput| {
    if input.patterns.len() > 20 || input.candidates.len() > 100 {
        return;
    }

    let patterns: Vec<String> = input
        .patterns
        .into_iter()
        .filter(|p| p.len() <= 256)
        .collect();
    let candidates: Vec<String> = input
        .candidates
        .into_iter()
        .filter(|c| c.len() <= 512)
        .collect();

    let _ = ociguard_hcl::fuzz::expand_excludes(&patterns, &candidates);
});
