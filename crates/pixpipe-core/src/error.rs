//! Error types for pixpipe-core.
//!
//! The core can fail in exactly two places: looking up request parameters
//! and constructing image buffers from caller-supplied data. Pixel access,
//! dispatch and the copy operation never fail on a well-formed [`Image`].
//!
//! # Usage
//!
//! ```rust
//! use pixpipe_core::{Error, Params};
//!
//! let params = Params::new();
//! let err = params.get_bool("gamma_correction").unwrap_err();
//! assert!(matches!(err, Error::MissingKey { .. }));
//! ```
//!
//! [`Image`]: crate::Image

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by pixpipe-core.
///
/// # Categories
///
/// - **Parameter errors**: [`MissingKey`](Error::MissingKey), [`WrongType`](Error::WrongType)
/// - **Buffer errors**: [`InvalidDimensions`](Error::InvalidDimensions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A required parameter is absent.
    #[error("missing parameter \"{key}\"")]
    MissingKey {
        /// Key that was looked up (dotted path for nested sets)
        key: String,
    },

    /// A parameter is present but holds a value of another type.
    ///
    /// Values are never coerced: `"true"` as a string is not a boolean.
    #[error("parameter \"{key}\" has type {found}, expected {expected}")]
    WrongType {
        /// Key that was looked up (dotted path for nested sets)
        key: String,
        /// Type the caller asked for
        expected: &'static str,
        /// Type actually stored
        found: &'static str,
    },

    /// Buffer length or dimensions do not describe a valid image.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Why the dimensions were rejected
        reason: String,
    },

    /// Catch-all with a custom message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates an [`Error::MissingKey`] error.
    #[inline]
    pub fn missing_key(key: impl Into<String>) -> Self {
        Self::MissingKey { key: key.into() }
    }

    /// Creates an [`Error::WrongType`] error.
    #[inline]
    pub fn wrong_type(key: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        Self::WrongType {
            key: key.into(),
            expected,
            found,
        }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::Other`] error.
    #[inline]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Returns `true` for errors caused by request parameters.
    #[inline]
    pub fn is_param_error(&self) -> bool {
        matches!(self, Self::MissingKey { .. } | Self::WrongType { .. })
    }

    /// Prefixes the key of a parameter error with `parent.`.
    ///
    /// Used when a lookup fails inside a nested parameter set so the error
    /// names the full path.
    pub(crate) fn nested_in(self, parent: &str) -> Self {
        match self {
            Self::MissingKey { key } => Self::MissingKey {
                key: format!("{parent}.{key}"),
            },
            Self::WrongType {
                key,
                expected,
                found,
            } => Self::WrongType {
                key: format!("{parent}.{key}"),
                expected,
                found,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_message() {
        let err = Error::missing_key("source");
        assert_eq!(err.to_string(), "missing parameter \"source\"");
        assert!(err.is_param_error());
    }

    #[test]
    fn test_wrong_type_message() {
        let err = Error::wrong_type("gamma_correction", "bool", "string");
        let msg = err.to_string();
        assert!(msg.contains("gamma_correction"));
        assert!(msg.contains("bool"));
        assert!(msg.contains("string"));
    }

    #[test]
    fn test_nested_path() {
        let err = Error::missing_key("width").nested_in("resize");
        assert_eq!(err, Error::missing_key("resize.width"));

        let err = Error::invalid_dimensions(1, 1, "short").nested_in("resize");
        assert!(!err.is_param_error());
    }
}
