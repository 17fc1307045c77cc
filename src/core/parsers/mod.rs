//! Source parsers.
//!
//! - `jsx`: JSX/TSX source parser (uses swc for AST generation)

pub mod jsx;
