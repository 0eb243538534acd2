//! Error types shared by the clients, service, and persona store.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A required credential was empty when a client first needed it.
    #[error("{0} is missing")]
    MissingCredential(&'static str),

    /// Transport-level failure talking to an external service.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// An external service answered with a non-success status.
    #[error("api error: {0}")]
    Api(String),

    /// The model answered but carried no text.
    #[error("model returned no text")]
    EmptyCompletion,

    /// Persona file write or directory setup failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
