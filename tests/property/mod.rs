//! Property-based tests for identifier derivation

mod identifiers;
