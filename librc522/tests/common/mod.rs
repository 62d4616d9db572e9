// Shared submodules for the integration test crates. Each aggregator pulls
// this in by path, so the helpers compile once per test binary.
#![allow(dead_code)]


pub use librc522::test_support as helpers;
