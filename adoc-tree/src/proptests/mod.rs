//! Property-based tests for the syntax tree parser
//!
//! These tests verify invariants that should hold for ANY input, not just
//! specific fixtures. They complement the fixture-based tests by finding
//! edge cases and ensuring the parser is total on unexpected inputs.

mod generators;
mod invariants;
