//! Error types for the scorebook

use thiserror::Error;

/// Result type for scorebook operations
pub type Result<T> = std::result::Result<T, Error>;

/// Scorebook errors
#[derive(Error, Debug)]
pub enum Error {
    /// Player is not on any roster
    #[error("Unknown player: {0}")]
    UnknownPlayer(String),

    /// Regular period label missing from the quarter table
    #[error("Unknown period: {0}")]
    UnknownPeriod(String),

    /// Label is neither `Qn` nor `OTn`
    #[error("Invalid period label: {0}")]
    InvalidPeriod(String),

    /// End-of-period cumulative score is lower than the live score
    #[error("Cumulative score {given} for {side} is below the live score {live}")]
    ScoreBelowLive {
        /// Team side the check failed for
        side: &'static str,
        /// Cumulative value supplied by the caller
        given: i32,
        /// Live score at the time of the check
        live: i32,
    },

    /// Command line could not be parsed
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Metrics registry error
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}
