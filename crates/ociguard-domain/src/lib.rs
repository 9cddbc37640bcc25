//! Pure rule evaluation (no IO).
//!
//! Input: a workspace of parsed documents constructed elsewhere, plus their resolution contexts.
//! Output: findings + faults + verdict + summary data.

#![forbid(unsafe_code)]

pub mod emit;
pub mod extract;
pub mod fingerprint;
pub mod model;
pub mod policy;
pub mod report;
pub mod resolve;
pub mod rule;
pub mod rules;
pub mod schema;

mod engine;

#[cfg(test)]
mod test_support;

pub use engine::evaluate;
