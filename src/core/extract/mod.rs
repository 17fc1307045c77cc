//! Translation fragment extraction.
//!
//! - `normalize`: versioned whitespace policies for signatures
//! - `deps`: free-variable capture over JSX children
//! - `fragment`: tag validation, signature and key computation
//! - `finder`: module walk collecting every outermost tag

mod deps;
mod finder;
mod fragment;
mod normalize;

pub use deps::{CaptureError, DependencyCollector, Violation, capture_children};
pub use finder::extract_fragments;
pub use fragment::{Fragment, FragmentProcessor, KEY_LENGTH, key_of, signature_of};
pub use normalize::SignatureNormalizer;
