use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Network request failed
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Failed to parse a response or descriptor
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    UrlError(String),
    /// Writing or reading XML failed
    #[error("XML error: {0}")]
    XmlError(String),
    /// A statement could not be rendered into YQL
    #[error("Invalid query: {0}")]
    QueryError(String),
    /// A binder of the same kind is already part of the table
    #[error("Binder '{0}' is already defined in this table")]
    DuplicateBinder(String),
    /// A function binding with the same name is already part of the table
    #[error("Function '{0}' is already defined in this table")]
    DuplicateFunction(String),
    /// An input with the same id is already declared
    #[error("Input '{0}' is already declared")]
    DuplicateInput(String),
    /// OAuth signing or token refresh failed
    #[error("OAuth error: {0}")]
    OAuthError(String),
    /// Invalid input format
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// IO operation failed
    #[error("IO error: {0}")]
    IoError(String),
}

// Conversion implementations for common errors
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::NetworkError(err.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::UrlError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

// Custom type alias for Results in this application
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn test_duplicate_binder_display() {
        let err = AppError::DuplicateBinder("select".to_string());
        assert_eq!(
            err.to_string(),
            "Binder 'select' is already defined in this table"
        );
    }

    #[test]
    fn test_network_error_display() {
        let err = AppError::NetworkError("Connection timeout".to_string());
        assert!(err.to_string().contains("Network error"));
        assert!(err.to_string().contains("Connection timeout"));
    }

    #[test]
    fn test_url_error_from_parse_error() {
        let err: AppError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, AppError::UrlError(_)));
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.xml");
        let err: AppError = io.into();
        assert!(err.to_string().contains("IO error"));
        assert!(err.to_string().contains("missing.xml"));
    }

    #[test]
    fn test_query_error_display() {
        let err = AppError::QueryError("no items".to_string());
        assert!(err.to_string().contains("Invalid query"));
    }

    #[test]
    fn test_app_error_implements_error_trait() {
        use std::error::Error;
        let err: Box<dyn Error> = Box::new(AppError::OAuthError("test".to_string()));
        assert!(!err.to_string().is_empty());
    }
}
