//! Test harness synthesis for TypeScript, Python, Java and C++.
//!
//! Given a user's solution source, a parameter schema and test cases,
//! the engine resolves the function under test, renders each input as a
//! literal, wraps everything in a self-contained program that prints
//! per-case verdicts, and recovers those verdicts from raw output.

pub mod canonical;
pub mod formatter;
pub mod logical;
pub mod recovery;
pub mod registry;
pub mod resolver;
pub mod source;
pub mod synth;

#[cfg(test)]
mod execution_tests;

pub use formatter::format;
pub use recovery::{extract, extract_verdicts, RecoveryError};
pub use registry::{is_user_defined, lookup};
pub use resolver::{resolve, EntryPoint};
pub use synth::{synthesize_judge_harness, synthesize_test_harness};
