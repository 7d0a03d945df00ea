//! Client-side acceptance rules for a status response.
//!
//! Rules run in a fixed order and the first failure is reported, so every
//! rejected response names exactly one [`ResponseDefect`].

use thiserror::Error;

use crate::{
    identity::{matches, verify_issuer_signature},
    status::verify_response_signature,
    types::{
        Certificate, CertificateHash, CertificateStatusResponse, CertificateStore,
        CertificateUsage, PinnedCertificateStore,
    },
};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseDefect {
    #[error("response signature does not verify under the status certificate")]
    BadResponseSignature,

    #[error("response carries no certificate hash")]
    MissingCertificateHash,

    #[error("certificate hash algorithm differs from the request")]
    HashAlgorithmMismatch,

    #[error("certificate hash value differs from the request")]
    CertificateHashMismatch,

    #[error("status code is outside the protocol range")]
    UnrecognizedStatus,

    #[error("validity window end is not representable")]
    ValidityOverflow,

    #[error("validity window is empty")]
    EmptyValidityWindow,

    #[error("response is not valid yet")]
    NotYetValid,

    #[error("response has expired")]
    Expired,

    #[error("status certificate subjects are not the expected ones")]
    StatusSubjectMismatch,

    #[error("status certificate is neither issued by a trusted certificate nor a pinned root")]
    UntrustedIssuer,

    #[error("status certificate issuer signature does not verify")]
    BadIssuerSignature,

    #[error("status certificate is not allowed to sign status responses")]
    MissingStatusUsage,
}

/// What a client trusts when checking responses from one status server.
#[derive(Clone, Debug, Default)]
pub struct ResponseValidator {
    trusted_issuers: CertificateStore,
    pinned: PinnedCertificateStore,
    status_subjects: Vec<String>,
}

impl ResponseValidator {
    #[must_use]
    pub const fn new(trusted_issuers: CertificateStore, status_subjects: Vec<String>) -> Self {
        Self {
            trusted_issuers,
            pinned: PinnedCertificateStore { pinned_certificates: Vec::new() },
            status_subjects,
        }
    }

    #[must_use]
    pub fn with_pinned(mut self, pinned: PinnedCertificateStore) -> Self {
        self.pinned = pinned;
        self
    }

    /// Accept `response` as the answer to a query for `requested` at time `now`.
    ///
    /// # Errors
    ///
    /// Returns the first rule the response breaks.
    pub fn validate(
        &self,
        response: &CertificateStatusResponse,
        requested: &CertificateHash,
        now: i64,
    ) -> Result<(), ResponseDefect> {
        if !verify_response_signature(response) {
            return Err(ResponseDefect::BadResponseSignature);
        }

        let hash = &response.certificate;
        if hash.is_empty() {
            return Err(ResponseDefect::MissingCertificateHash);
        }
        if hash.algorithm != requested.algorithm {
            return Err(ResponseDefect::HashAlgorithmMismatch);
        }
        if hash.value != requested.value {
            return Err(ResponseDefect::CertificateHashMismatch);
        }

        if !response.status.is_recognized() {
            return Err(ResponseDefect::UnrecognizedStatus);
        }

        let Some(valid_until) = response.valid_from.checked_add(i64::from(response.valid_length)) else {
            return Err(ResponseDefect::ValidityOverflow);
        };
        if response.valid_length <= 0 {
            return Err(ResponseDefect::EmptyValidityWindow);
        }
        if response.valid_from > now {
            return Err(ResponseDefect::NotYetValid);
        }
        if now > valid_until {
            return Err(ResponseDefect::Expired);
        }

        self.check_status_certificate(&response.status_certificate)
    }

    fn check_status_certificate(&self, cert: &Certificate) -> Result<(), ResponseDefect> {
        if cert.subjects != self.status_subjects {
            return Err(ResponseDefect::StatusSubjectMismatch);
        }

        match &cert.issuer {
            // Issued certificates are anchored by the trusted store alone.
            Some(named) => {
                let issuer = self.trusted_issuer(named).ok_or(ResponseDefect::UntrustedIssuer)?;
                if !verify_issuer_signature(cert, issuer) {
                    return Err(ResponseDefect::BadIssuerSignature);
                }
            }
            // Roots are anchored by a pin. A self-signature, when present, is
            // checked first so that tampering with it is reported as such.
            None => {
                if !cert.issuer_signature.is_empty() && !verify_issuer_signature(cert, cert) {
                    return Err(ResponseDefect::BadIssuerSignature);
                }
                // An unrecognized pin algorithm counts as not pinned.
                if !self.pinned.is_pinned(cert).unwrap_or(false) {
                    return Err(ResponseDefect::UntrustedIssuer);
                }
            }
        }

        if !cert.usages.contains(&CertificateUsage::StatusSigning) {
            return Err(ResponseDefect::MissingStatusUsage);
        }
        Ok(())
    }

    fn trusted_issuer(&self, issuer: &CertificateHash) -> Option<&Certificate> {
        // An issuer hash under an unrecognized algorithm names nobody we trust.
        self.trusted_issuers
            .iter()
            .find(|candidate| matches(candidate, issuer).unwrap_or(false))
    }
}
