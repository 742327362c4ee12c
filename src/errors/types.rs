//! # Error Types
//!
//! Error types for porticoctl operations using `thiserror`.

/// Custom result type for porticoctl operations
pub type Result<T> = std::result::Result<T, PorticoError>;

/// Main error type for the porticoctl client
#[derive(thiserror::Error, Debug)]
pub enum PorticoError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O errors with additional context
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {context}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        context: String,
    },

    /// Input validation errors
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Errors reaching the control plane at all
    #[error("Transport error: {context}")]
    Transport {
        #[source]
        source: reqwest::Error,
        context: String,
    },

    /// Non-success responses from the control plane
    #[error("Control plane error: {message} (status: {status})")]
    Http {
        message: String,
        status: u16,
    },

    /// Resource not found errors
    #[error("{resource_type} '{id}' not found")]
    NotFound {
        resource_type: String,
        id: String,
    },

    /// Resource already exists errors
    #[error("{resource_type} '{name}' already exists")]
    AlreadyExists {
        resource_type: String,
        name: String,
    },

    /// Resource conflict errors (e.g. ambiguous ownership)
    #[error("Resource conflict: {message}")]
    Conflict {
        message: String,
        resource_type: String,
    },

    /// Internal errors
    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl PorticoError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>>(
        message: S,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a validation error with field information
    pub fn validation_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a transport error
    pub fn transport<S: Into<String>>(context: S, source: reqwest::Error) -> Self {
        Self::Transport {
            source,
            context: context.into(),
        }
    }

    /// Create an HTTP error
    pub fn http<S: Into<String>>(message: S, status: u16) -> Self {
        Self::Http {
            message: message.into(),
            status,
        }
    }

    /// Create a not found error
    pub fn not_found<R: Into<String>, I: Into<String>>(resource_type: R, id: I) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Create an already exists error
    pub fn already_exists<R: Into<String>, N: Into<String>>(resource_type: R, name: N) -> Self {
        Self::AlreadyExists {
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict<M: Into<String>, R: Into<String>>(message: M, resource_type: R) -> Self {
        Self::Conflict {
            message: message.into(),
            resource_type: resource_type.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error means the resource already existed in the store.
    ///
    /// Used by callers that treat creation as idempotent (the default
    /// virtual host bootstrap swallows exactly this class of error).
    pub fn is_already_exists(&self) -> bool {
        matches!(self, PorticoError::AlreadyExists { .. })
    }

    /// Whether this error means the resource was not found in the store
    pub fn is_not_found(&self) -> bool {
        matches!(self, PorticoError::NotFound { .. })
    }
}

// Error conversions for common external error types
impl From<std::io::Error> for PorticoError {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            source: error,
            context: "I/O operation failed".to_string(),
        }
    }
}

impl From<serde_json::Error> for PorticoError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            source: error,
            context: "JSON serialization failed".to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for PorticoError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let error_messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map_or("Invalid value".to_string(), |m| m.to_string())
                    })
                    .collect();
                format!("{}: {}", field, error_messages.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");

        Self::validation(format!("Validation failed: {}", message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = PorticoError::config("Test configuration error");
        assert!(matches!(error, PorticoError::Config { .. }));
        assert_eq!(error.to_string(), "Configuration error: Test configuration error");
    }

    #[test]
    fn test_validation_error() {
        let error = PorticoError::validation_field("Invalid domain format", "domains");
        assert!(matches!(error, PorticoError::Validation { .. }));
        if let PorticoError::Validation { field, .. } = error {
            assert_eq!(field, Some("domains".to_string()));
        }
    }

    #[test]
    fn test_not_found_display() {
        let error = PorticoError::not_found("virtual host", "payments");
        assert_eq!(error.to_string(), "virtual host 'payments' not found");
        assert!(error.is_not_found());
        assert!(!error.is_already_exists());
    }

    #[test]
    fn test_already_exists_classification() {
        let error = PorticoError::already_exists("virtual host", "default");
        assert!(error.is_already_exists());
        assert_eq!(error.to_string(), "virtual host 'default' already exists");

        // Conflicts that are not creation collisions must not classify as
        // already-exists, or the default-vhost bootstrap would swallow them.
        let conflict =
            PorticoError::conflict("domain foo.com matched 2 virtual hosts", "virtual host");
        assert!(!conflict.is_already_exists());
    }

    #[test]
    fn test_error_conversions() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: PorticoError = io_error.into();
        assert!(matches!(error, PorticoError::Io { .. }));

        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error: PorticoError = json_error.into();
        assert!(matches!(error, PorticoError::Serialization { .. }));
    }
}
