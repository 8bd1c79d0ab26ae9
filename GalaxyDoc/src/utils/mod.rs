//! Utility functions

pub mod path;

pub use path::{normalize_components, normalize_separators, relative_path};
