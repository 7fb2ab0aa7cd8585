// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Error types for the pose inference library.

use std::fmt;

/// Result type alias for pose inference operations.
pub type Result<T> = std::result::Result<T, PoseError>;

/// Main error type for the pose inference library.
#[derive(Debug)]
pub enum PoseError {
    /// Operation attempted before `initialize` or after `finalize`.
    NotInitialized,
    /// Duplicate `initialize` while a session is already live.
    AlreadyInitialized,
    /// Error loading the ONNX model (missing, corrupt, or incompatible).
    ModelLoadError(String),
    /// Empty or malformed input frame.
    InvalidInput(String),
    /// Error during model execution (shape mismatch, backend fault).
    InferenceError(String),
    /// Unknown command code passed to the session's command hook.
    UnsupportedCommand(i32),
    /// Error processing images.
    ImageError(String),
    /// Wrapped `std::io::Error`.
    Io(std::io::Error),
}

impl fmt::Display for PoseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "Not initialized"),
            Self::AlreadyInitialized => write!(f, "Already initialized"),
            Self::ModelLoadError(msg) => write!(f, "Model load error: {msg}"),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Self::InferenceError(msg) => write!(f, "Inference error: {msg}"),
            Self::UnsupportedCommand(cmd) => write!(f, "Command ({cmd}) is not supported"),
            Self::ImageError(msg) => write!(f, "Image error: {msg}"),
            Self::Io(err) => write!(f, "IO error: {err}"),
        }
    }
}

impl std::error::Error for PoseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PoseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<image::ImageError> for PoseError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PoseError::ModelLoadError("test".to_string());
        assert_eq!(err.to_string(), "Model load error: test");

        let err = PoseError::NotInitialized;
        assert_eq!(err.to_string(), "Not initialized");

        let err = PoseError::UnsupportedCommand(3);
        assert_eq!(err.to_string(), "Command (3) is not supported");
    }

    #[test]
    fn test_io_error_source() {
        let err = PoseError::Io(std::io::Error::other("boom"));
        assert!(std::error::Error::source(&err).is_some());

        let err = PoseError::AlreadyInitialized;
        assert!(std::error::Error::source(&err).is_none());
    }
}
