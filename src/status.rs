use std::time::{SystemTime, UNIX_EPOCH};

use ed25519_dalek::SigningKey;
use crate::{
    errors::StatusError,
    identity::{CertificateIndex, CertificateSet},
    ser::response_digest,
    signing::{sign, verify},
    types::{
        Certificate, CertificateHash, CertificateStatus, CertificateStatusRequest,
        CertificateStatusResponse, CertificateStore, PrivateKey, STATUS_VALID_LENGTH,
    },
};

/// Deny wins over allow; anything in neither list is unknown.
///
/// # Errors
///
/// Propagates lookup errors (an unrecognized algorithm in `requested`).
pub fn decide<D, A>(requested: &CertificateHash, deny: &D, allow: &A) -> Result<CertificateStatus, StatusError>
where
    D: CertificateSet + ?Sized,
    A: CertificateSet + ?Sized,
{
    if deny.contains_hash(requested)? {
        return Ok(CertificateStatus::Revoked);
    }
    if allow.contains_hash(requested)? {
        return Ok(CertificateStatus::Valid);
    }
    Ok(CertificateStatus::Unknown)
}

/// Everything the responder loads at startup. Immutable once built and
/// shared by reference with every request.
#[derive(Clone, Debug)]
pub struct ResponderConfig {
    certificate: Certificate,
    signing_key: SigningKey,
    allow: CertificateIndex,
    deny: CertificateIndex,
}

impl ResponderConfig {
    /// # Errors
    ///
    /// Returns `StatusError::KeyMismatch` when `private_key` does not belong
    /// to `certificate`, or the key parsing errors of
    /// [`crate::signing::parse_signing_key`].
    pub fn new(
        certificate: Certificate,
        private_key: &PrivateKey,
        allow: CertificateStore,
        deny: CertificateStore,
    ) -> Result<Self, StatusError> {
        let signing_key = private_key.signing_key()?;
        if signing_key.verifying_key().to_bytes() != certificate.signing_public_key {
            return Err(StatusError::KeyMismatch);
        }
        tracing::info!(valid = allow.len(), revoked = deny.len(), "loaded status lists");
        Ok(Self {
            certificate,
            signing_key,
            allow: CertificateIndex::build(allow)?,
            deny: CertificateIndex::build(deny)?,
        })
    }

    #[must_use]
    pub const fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    #[must_use]
    pub const fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    #[must_use]
    pub const fn allow(&self) -> &CertificateIndex {
        &self.allow
    }

    #[must_use]
    pub const fn deny(&self) -> &CertificateIndex {
        &self.deny
    }
}

/// (Re)compute `status_signature` over the response digest.
pub fn sign_response(response: &mut CertificateStatusResponse, key: &SigningKey) {
    response.status_signature = sign(&response_digest(response), key).to_vec();
}

/// Outer signature check against the status certificate's signing key.
#[must_use]
pub fn verify_response_signature(response: &CertificateStatusResponse) -> bool {
    verify(
        &response_digest(response),
        &response.status_signature,
        &response.status_certificate.signing_public_key,
    )
}

/// The correct, signed answer to `request` as of `now`.
///
/// # Errors
///
/// Propagates [`decide`] errors.
pub fn assemble_valid_response(
    request: &CertificateStatusRequest,
    config: &ResponderConfig,
    now: i64,
) -> Result<CertificateStatusResponse, StatusError> {
    let status = decide(&request.certificate, &config.deny, &config.allow)?;
    tracing::debug!(certificate = %request.certificate, ?status, "status decided");
    let mut response = CertificateStatusResponse {
        certificate: request.certificate.clone(),
        status,
        valid_from: now,
        valid_length: STATUS_VALID_LENGTH,
        status_certificate: config.certificate.clone(),
        status_signature: Vec::new(),
    };
    sign_response(&mut response, &config.signing_key);
    Ok(response)
}

/// Seconds since the epoch; clocks set before 1970 read as 0.
#[must_use]
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}
