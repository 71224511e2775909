//! Filesystem primitives for regbase
//!
//! Provides normalized path handling, identifier validation for names that
//! become path components, and locked atomic I/O for baseline, ledger and
//! configuration documents.

pub mod document;
pub mod error;
pub mod io;
pub mod path;

pub use document::DocumentStore;
pub use error::{Error, Result};
pub use path::{NormalizedPath, validate_identifier};
