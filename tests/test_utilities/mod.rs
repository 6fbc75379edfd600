#![allow(dead_code)]
//! Shared helpers for the integration and end-to-end suites
pub mod fixtures;
pub mod mocks;
