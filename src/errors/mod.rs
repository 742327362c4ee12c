//! # Error Handling
//!
//! Error types for porticoctl using `thiserror`. The CLI boundary wraps these
//! in `anyhow` for user-facing context; everything below it returns
//! [`PorticoError`].

pub mod types;

pub use types::{PorticoError, Result};
