use std::fmt::{self, Debug, Display};
use std::io;

/// Provides `EpigridError` and maps to other errors to
/// convert to an `EpigridError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum EpigridError {
    IoError(io::Error),
    JsonError(serde_json::Error),
    CsvError(csv::Error),
    /// A grid was configured with a dimension that cannot hold any cells.
    InvalidConfig(String),
    /// A population strategy was applied to a grid that is already populated or has
    /// already been stepped.
    AlreadyPopulated,
    InvalidParameter(String),
}

impl From<io::Error> for EpigridError {
    fn from(error: io::Error) -> Self {
        EpigridError::IoError(error)
    }
}

impl From<serde_json::Error> for EpigridError {
    fn from(error: serde_json::Error) -> Self {
        EpigridError::JsonError(error)
    }
}

impl From<csv::Error> for EpigridError {
    fn from(error: csv::Error) -> Self {
        EpigridError::CsvError(error)
    }
}

impl std::error::Error for EpigridError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EpigridError::IoError(error) => Some(error),
            EpigridError::JsonError(error) => Some(error),
            EpigridError::CsvError(error) => Some(error),
            _ => None,
        }
    }
}

impl Display for EpigridError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EpigridError::IoError(error) => write!(f, "I/O error: {error}"),
            EpigridError::JsonError(error) => write!(f, "JSON error: {error}"),
            EpigridError::CsvError(error) => write!(f, "CSV error: {error}"),
            EpigridError::InvalidConfig(msg) => write!(f, "invalid grid configuration: {msg}"),
            EpigridError::AlreadyPopulated => {
                write!(f, "the grid has already been populated or stepped")
            }
            EpigridError::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_io_errors() {
        let error: EpigridError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert!(matches!(error, EpigridError::IoError(_)));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn displays_config_errors() {
        let error = EpigridError::InvalidConfig("width must be positive".to_string());
        assert_eq!(
            error.to_string(),
            "invalid grid configuration: width must be positive"
        );
        assert!(std::error::Error::source(&error).is_none());
    }
}
