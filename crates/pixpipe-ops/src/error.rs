//! Error types for transforms.

use thiserror::Error;

/// Error type for transforms and pipelines.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Parameter lookup or other core failure.
    #[error(transparent)]
    Core(#[from] pixpipe_core::Error),

    /// Parameter present and well typed but out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A transform could not complete.
    #[error("transform failed: {0}")]
    Failed(String),

    /// Error raised by an external collaborator (image source, plugin).
    #[error(transparent)]
    Source(Box<dyn std::error::Error + Send + Sync>),
}

impl OpsError {
    /// Wraps a collaborator's error.
    pub fn source(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Source(Box::new(err))
    }

    /// Returns `true` for errors caused by request parameters.
    pub fn is_param_error(&self) -> bool {
        match self {
            Self::Core(e) => e.is_param_error(),
            Self::InvalidParameter(_) => true,
            Self::Failed(_) | Self::Source(_) => false,
        }
    }
}

/// Result type for transforms.
pub type OpsResult<T> = Result<T, OpsError>;
