//! End-to-end tests for xlmerge-xlsx.
//!
//! Each test assembles the exact package it needs, saves it to a temp file,
//! then reads it back with `XlsxReader` and asserts on the model. Writer
//! tests go the other way: build a workbook, write it, read it again.

mod common;
mod writing;

// Re-export common utilities for submodules
pub use common::*;
