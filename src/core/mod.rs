//! Extraction and reconciliation engine.
//!
//! ## Pipeline
//!
//! 1. `file_scanner` + `context`: configured source files, parsed in parallel
//! 2. `extract`: `<T>` fragments with their signatures, keys and deps
//! 3. `registry`: parse the translations file and reconcile it with the scan
//! 4. `registry_file`: write the result back atomically
//!
//! `transform` is the build-time counterpart: it rewrites the fragments of a
//! single file by key or by translation.

pub mod context;
pub mod extract;
pub mod file_scanner;
pub mod location;
pub mod parsers;
pub mod registry;
pub mod registry_file;
pub mod templates;
pub mod transform;
