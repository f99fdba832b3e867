//! Barangay certificate command-line tool
//!
//! Library half of the `barangay-cert` binary: configuration loading and
//! the `render` / `inspect` commands.

pub mod commands;
pub mod config;
