use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatusError {
    #[error("invalid hash algorithm: code {0} is not part of the protocol numbering")]
    InvalidAlgorithm(i32),

    #[error("invalid length: expected {expected} got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("invalid key: {0}")]
    InvalidKey(&'static str),

    #[error("signing failed: {0}")]
    SigningFailed(&'static str),

    #[error("private key does not match the certificate signing key")]
    KeyMismatch,

    #[error("unknown response strategy: {0}")]
    UnknownStrategy(String),
}
