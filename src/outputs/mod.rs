//! Output generation for enriched items.
//!
//! # Submodules
//!
//! - [`json`]: writes the item list as pretty-printed JSON to a file or stdout

pub mod json;
