//! UCI protocol errors.

use cimille_core::PositionError;

/// Errors that can occur during UCI protocol handling.
#[derive(Debug, thiserror::Error)]
pub enum UciError {
    /// The `position` command is missing `startpos` or `fen` keyword.
    #[error("malformed position command: missing startpos or fen keyword")]
    MalformedPosition,

    /// The FEN or a replayed move in a `position` command was rejected.
    #[error(transparent)]
    Position(#[from] PositionError),

    /// A `go` parameter was given without its value.
    #[error("missing value for go parameter {param}")]
    MissingGoValue {
        /// The parameter name, e.g. `wtime`.
        param: String,
    },

    /// A `go` parameter value could not be parsed.
    #[error("invalid value for go parameter {param}: {value}")]
    InvalidGoValue {
        /// The parameter name.
        param: String,
        /// The raw value that failed to parse.
        value: String,
    },

    /// `setoption` named an option this engine does not have.
    #[error("unknown option: {name}")]
    UnknownOption {
        /// The option name as sent.
        name: String,
    },

    /// `setoption` value missing or not a valid number.
    #[error("invalid value for option {name}: {value}")]
    InvalidOptionValue {
        /// The option name.
        name: String,
        /// The raw value, empty if missing.
        value: String,
    },

    /// An I/O error occurred while reading from stdin.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
