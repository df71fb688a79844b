//! Error types for page transformation.

use thiserror::Error;

/// Errors that can occur while transforming a page.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Exercise sections exist but there is no navigation container to hold
    /// their tabs.
    #[error("page has {exercises} exercise section(s) but no navigation container matching `{selector}`")]
    MissingNav { exercises: usize, selector: String },

    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
