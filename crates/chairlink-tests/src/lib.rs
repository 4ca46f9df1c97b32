//! Integration tests for the chairlink controller
//!
//! This crate contains end-to-end tests that exercise the full stack:
//! - dispatch controller and interlock
//! - HTTP transport
//! - in-process device simulator
//!
//! # Test Structure
//!
//! - `e2e_test.rs` - Full operator sessions against the simulated device

// This crate only contains tests, no library code
