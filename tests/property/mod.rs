//! Property-based tests for store invariants

mod cart_invariants;
mod store_invariants;
