//! Query state: URL parameters in, cleaned search parameters out.
//!
//! - `raw`: the open key/value mapping read from a query string
//! - `params`: the cleaner and the partner/partnership parameter builders
//! - `form`: the search form model and its cascading selections

pub mod form;
pub mod params;
pub mod raw;

pub use form::*;
pub use params::*;
pub use raw::*;
