//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - API wire shapes (`Configuration`, `Partner`, `Partnership`, `Paginated`)
//! - the configuration tree (`ConfigNode`, `ConfigRecord`)
//! - normalized options (`ValueLabel`, `NamedOption`)
//! - pagination (`PageInfo`)

pub mod page;
pub mod types;

pub use page::*;
pub use types::*;
