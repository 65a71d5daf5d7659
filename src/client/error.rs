//! Client-side error types.

/// Errors raised by the client store and its ports.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// `generate` was called without both a mood and a genre selected.
    #[error("Mood and genre must both be selected")]
    MissingSelection,

    /// Transport failure talking to the catalog service.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog service answered with a non-success status.
    #[error("Catalog service returned status {0}")]
    Status(u16),

    /// IO error from the persistence port.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Get the error code string.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingSelection => "MISSING_SELECTION",
            Self::Http(_) => "HTTP_ERROR",
            Self::Status(_) => "STATUS_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
        }
    }

    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingSelection => "Please select both mood and genre",
            Self::Http(_) | Self::Status(_) => "Something went wrong while fetching tracks.",
            Self::Io(_) | Self::Json(_) => "Could not save your tracks.",
        }
    }

    /// Whether the error came from the network round trip.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status(_))
    }
}

/// Result type alias using ClientError.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(
            ClientError::MissingSelection.user_message(),
            "Please select both mood and genre"
        );
        assert_eq!(
            ClientError::Status(500).user_message(),
            "Something went wrong while fetching tracks."
        );
    }

    #[test]
    fn test_transport_classification() {
        assert!(ClientError::Status(502).is_transport());
        assert!(!ClientError::MissingSelection.is_transport());

        let json = serde_json::from_str::<u32>("nope").unwrap_err();
        assert!(!ClientError::from(json).is_transport());
    }
}
