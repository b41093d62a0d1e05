//! Error types for the cache driver
//!
//! The core crate reports absence as `None`/`false` and never fails; every
//! error here comes from the driver's own I/O, script parsing, or export.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

// == Driver Error Enum ==
/// Unified error type for the cache driver.
#[derive(Error, Debug)]
pub enum DriverError {
    /// A file could not be opened or created
    #[error("cannot open {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing to an output sink failed
    #[error("output error: {0}")]
    Io(#[from] io::Error),

    /// A script line could not be parsed
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Summary export failed
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    /// A command line option is out of range
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl DriverError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        DriverError::File {
            path: path.into(),
            source,
        }
    }

    /// Builds a parse error for a 1-based line number.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        DriverError::Parse {
            line,
            message: message.into(),
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache driver.
pub type Result<T> = std::result::Result<T, DriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_names_line() {
        let err = DriverError::parse(7, "unknown command 'frob'");
        assert_eq!(err.to_string(), "line 7: unknown command 'frob'");
    }

    #[test]
    fn test_file_error_names_path() {
        let err = DriverError::file(
            "missing/ops.txt",
            io::Error::new(io::ErrorKind::NotFound, "not found"),
        );
        assert_eq!(err.to_string(), "cannot open missing/ops.txt: not found");
    }
}
