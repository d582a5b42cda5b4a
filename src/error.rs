use sqlx::Error as SqlxError;
use std::fmt;
use std::panic::Location;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum DataError {
    /// Any failure while connecting to or querying the database.
    #[error("error in [{}] at line [{}]: {source}", .context.file, .context.line)]
    Load {
        source: SqlxError,
        context: ErrorContext,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DataError {
    /// Wrap a database failure, recording the caller's location as context.
    #[track_caller]
    pub fn wrap(source: SqlxError) -> Self {
        DataError::Load {
            source,
            context: ErrorContext::from(Location::caller()),
        }
    }

    /// The underlying database error, if this is a load failure.
    pub fn cause(&self) -> Option<&SqlxError> {
        match self {
            DataError::Load { source, .. } => Some(source),
            _ => None,
        }
    }

    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            DataError::Load { context, .. } => Some(context),
            _ => None,
        }
    }
}

/// Where a wrapped failure was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorContext {
    pub file: &'static str,
    pub line: u32,
}

impl From<&'static Location<'static>> for ErrorContext {
    fn from(loc: &'static Location<'static>) -> Self {
        Self {
            file: loc.file(),
            line: loc.line(),
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_records_call_site() {
        let line = line!() + 1;
        let err = DataError::wrap(SqlxError::RowNotFound);
        let ctx = err.context().copied().expect("load error has context");
        assert_eq!(ctx.line, line);
        assert!(ctx.file.ends_with("error.rs"));
        assert!(matches!(err.cause(), Some(SqlxError::RowNotFound)));
    }

    #[test]
    fn display_names_file_and_line() {
        let err = DataError::Load {
            source: SqlxError::RowNotFound,
            context: ErrorContext {
                file: "src/db/loader.rs",
                line: 42,
            },
        };
        let msg = err.to_string();
        assert!(msg.starts_with("error in [src/db/loader.rs] at line [42]: "));
    }
}
