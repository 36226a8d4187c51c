//! `partners-directory` library crate.
//!
//! The binary (`partners`) is a thin wrapper around this library so that:
//!
//! - query normalization is testable without spawning processes
//! - the parameter builders and option selectors are reusable by other front-ends
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod logging;
pub mod mobility;
pub mod options;
pub mod query;
pub mod report;
pub mod tui;
