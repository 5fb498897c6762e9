//! Workflow integration tests
//!
//! Each test drives the `keeper` binary against its own temporary backup
//! directory and config file.

pub mod plan;
