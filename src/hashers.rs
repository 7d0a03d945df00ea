use sha2::{Digest, Sha256, Sha512};
use crate::{errors::StatusError, types::HashAlgorithm};

/// Digest `bytes` under `algorithm`.
///
/// `IDENTITY` hands the input back unchanged and logs a warning on every
/// call. It is a debugging aid only.
///
/// # Errors
///
/// Returns `StatusError::InvalidAlgorithm` for any code outside the protocol
/// numbering. No default is ever substituted.
pub fn hash(bytes: &[u8], algorithm: HashAlgorithm) -> Result<Vec<u8>, StatusError> {
    match algorithm {
        HashAlgorithm::Identity => {
            tracing::warn!(len = bytes.len(), "bytes hashed using the identity algorithm");
            Ok(bytes.to_vec())
        }
        HashAlgorithm::Sha256 => Ok(Sha256::digest(bytes).to_vec()),
        HashAlgorithm::Sha512 => Ok(Sha512::digest(bytes).to_vec()),
        HashAlgorithm::Unrecognized(code) => Err(StatusError::InvalidAlgorithm(code)),
    }
}
