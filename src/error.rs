use http::{Method, StatusCode};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Method {method} is not allowed for path '{path}'")]
    MethodNotAllowed {
        method: Method,
        path: String,
        allowed: Vec<Method>,
    },

    #[error("Route '{name}' already exists for path '{path}'.")]
    NamingConflict { name: String, path: String },

    #[error("No route found with name '{name}'")]
    UnknownRoute { name: String },

    #[error("Route '{name}' is missing parameter '{parameter}'")]
    MissingParameter { name: String, parameter: String },

    #[error("Failed to read route manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse route manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid route manifest: {0}")]
    Manifest(String),
}

/// Malformed registrations. Raised when a route is registered, never when it is matched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("'{0}' is not a recognized HTTP method")]
    UnknownMethod(String),

    #[error("methods cannot be given for a view that declares its own operations")]
    MethodsWithResource,

    #[error("unrecognized view type")]
    UnrecognizedView,

    #[error("invalid path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("route name must be a string, got {0}")]
    InvalidName(String),
}

impl Error {
    /// Status code the HTTP layer should answer with, when the error maps to one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::MethodNotAllowed { .. } => Some(StatusCode::METHOD_NOT_ALLOWED),
            _ => None,
        }
    }

    /// Methods registered for the matched path, for an `Allow` header.
    pub fn allowed_methods(&self) -> Option<&[Method]> {
        match self {
            Self::MethodNotAllowed { allowed, .. } => Some(allowed),
            _ => None,
        }
    }
}
