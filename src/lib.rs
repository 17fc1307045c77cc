//! traks - translation tags for JSX
//!
//! traks finds `<T>` translation tags in JSX sources, gives every tag a
//! content-addressed key, and keeps a translations file (a JS module with one
//! function per key and language) in sync with the source tree.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (arguments, commands, reporting)
//! - `config`: Configuration file loading and validation
//! - `core`: Extraction, registry reconciliation and build-time substitution
//! - `error`: Domain error taxonomy

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
