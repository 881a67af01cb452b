//! Error types for Horizon Statechart.

use std::fmt;

use crate::object::ObjectError;

/// The main error type for Horizon Statechart operations.
#[derive(Debug)]
pub enum StatechartError {
    /// Object-tree error.
    Object(ObjectError),
    /// A configuration document could not be parsed.
    Config(String),
}

impl fmt::Display for StatechartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object(err) => write!(f, "Object error: {err}"),
            Self::Config(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for StatechartError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Object(err) => Some(err),
            Self::Config(_) => None,
        }
    }
}

impl From<ObjectError> for StatechartError {
    fn from(err: ObjectError) -> Self {
        Self::Object(err)
    }
}

/// A specialized Result type for Horizon Statechart operations.
pub type Result<T> = std::result::Result<T, StatechartError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_source_chain() {
        let err = StatechartError::from(ObjectError::CircularParentage);
        assert!(err.to_string().starts_with("Object error:"));
        assert!(err.source().is_some());

        let err = StatechartError::Config("bad key".into());
        assert_eq!(err.to_string(), "Invalid configuration: bad key");
        assert!(err.source().is_none());
    }
}
