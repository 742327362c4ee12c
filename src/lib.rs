//! # porticoctl
//!
//! CLI client for the Portico API gateway control plane. Builds route
//! and virtual host configuration objects from flags or files, resolves
//! upstream references (including Kubernetes service lookups) and
//! renders objects for human or machine consumption.
//!
//! ## Architecture
//!
//! ```text
//! CLI Layer (clap) → Services (builders/resolvers) → ConfigStore
//!        ↓                                               ↓
//!  Output Formatting                          REST / in-memory backends
//! ```
//!
//! The control plane itself is an opaque collaborator behind the
//! [`storage::ConfigStore`] trait: this client constructs and validates
//! configuration, the control plane owns persistence and propagation.

pub mod cli;
pub mod domain;
pub mod errors;
pub mod services;
pub mod storage;

// Re-export commonly used types
pub use errors::{PorticoError, Result};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_available() {
        assert!(!VERSION.is_empty());
        assert_eq!(APP_NAME, "porticoctl");
    }
}
