//! Reporting utilities: result tables, option lists and parameter dumps.

pub mod format;

pub use format::*;
