use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No file path is associated with this document")]
    NoPath,

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Dictionary error: {0}")]
    Dictionary(String),
}

/// Failures of the voice-to-text pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VoiceError {
    #[error("Could not understand the audio")]
    Unintelligible,

    #[error("Could not request results: {0}")]
    ServiceUnavailable(String),

    #[error("Microphone error: {0}")]
    Microphone(String),

    #[error("Voice capture is already running")]
    Busy,

    #[error("Voice capture cancelled")]
    Cancelled,
}

/// Convenience type alias for Results with AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert!(app_err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_display() {
        let err = AppError::Settings("no configuration directory".to_string());
        assert_eq!(err.to_string(), "Settings error: no configuration directory");

        let err = AppError::Dictionary("no word list".to_string());
        assert_eq!(err.to_string(), "Dictionary error: no word list");

        let err = AppError::NoPath;
        assert_eq!(err.to_string(), "No file path is associated with this document");
    }

    #[test]
    fn test_voice_error_messages() {
        assert_eq!(VoiceError::Unintelligible.to_string(), "Could not understand the audio");
        assert_eq!(
            VoiceError::ServiceUnavailable("timed out".to_string()).to_string(),
            "Could not request results: timed out"
        );
    }
}
