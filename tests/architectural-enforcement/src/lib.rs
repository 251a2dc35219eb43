//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - The engine never blocks: no sleep calls, no spawned threads in anty-core
//! - The engine never panics: no unwrap/expect in production code paths
//!
//! These tests are designed to catch violations early in the development cycle.

#![allow(dead_code)]

pub fn placeholder() {
    // Placeholder to make this a valid library
}
