//! Certificate identity: a certificate *is* the hash of its canonical digest.

use std::collections::HashSet;

use ed25519_dalek::SigningKey;
use crate::{
    errors::StatusError,
    hashers::hash,
    ser::certificate_digest,
    signing::{sign, verify},
    types::{
        Certificate, CertificateHash, CertificateStore, HashAlgorithm, PinnedCertificate,
        PinnedCertificateStore, DEFAULT_HASH_ALGORITHM,
    },
};

/// `{algorithm, H(digest(cert, include_signature = true))}`
///
/// # Errors
///
/// Returns `StatusError::InvalidAlgorithm` for an unrecognized algorithm.
pub fn hash_certificate(cert: &Certificate, algorithm: HashAlgorithm) -> Result<CertificateHash, StatusError> {
    let value = hash(&certificate_digest(cert, true), algorithm)?;
    Ok(CertificateHash { algorithm, value })
}

/// True when `candidate` equals the certificate's hash under the candidate's
/// own algorithm. Both algorithm and value must agree.
///
/// # Errors
///
/// Returns `StatusError::InvalidAlgorithm` when the candidate names an
/// unrecognized algorithm.
pub fn matches(cert: &Certificate, candidate: &CertificateHash) -> Result<bool, StatusError> {
    Ok(*candidate == hash_certificate(cert, candidate.algorithm)?)
}

/// Linear scan: does any certificate in `certificates` match `candidate`?
///
/// # Errors
///
/// Propagates [`matches`] errors.
pub fn is_in(candidate: &CertificateHash, certificates: &[Certificate]) -> Result<bool, StatusError> {
    for cert in certificates {
        if matches(cert, candidate)? {
            return Ok(true);
        }
    }
    Ok(false)
}

impl Certificate {
    /// # Errors
    ///
    /// See [`hash_certificate`].
    pub fn hash(&self, algorithm: HashAlgorithm) -> Result<CertificateHash, StatusError> {
        hash_certificate(self, algorithm)
    }

    /// # Errors
    ///
    /// See [`matches`].
    pub fn matches(&self, candidate: &CertificateHash) -> Result<bool, StatusError> {
        matches(self, candidate)
    }
}

/// Membership seam used by the status decision.
pub trait CertificateSet {
    /// # Errors
    ///
    /// Returns `StatusError::InvalidAlgorithm` when the lookup needs to hash
    /// under an unrecognized algorithm.
    fn contains_hash(&self, candidate: &CertificateHash) -> Result<bool, StatusError>;
}

impl CertificateSet for [Certificate] {
    fn contains_hash(&self, candidate: &CertificateHash) -> Result<bool, StatusError> {
        is_in(candidate, self)
    }
}

impl CertificateSet for CertificateStore {
    fn contains_hash(&self, candidate: &CertificateHash) -> Result<bool, StatusError> {
        is_in(candidate, &self.certificates)
    }
}

/// A store with its SHA-256 and SHA-512 hashes precomputed, so lookups
/// under those algorithms are a set probe instead of a rehash of every member.
/// Other algorithms fall back to the linear scan, which keeps results
/// identical to [`is_in`].
#[derive(Clone, Debug, Default)]
pub struct CertificateIndex {
    store: CertificateStore,
    hashes: HashSet<CertificateHash>,
}

const INDEXED_ALGORITHMS: [HashAlgorithm; 2] = [HashAlgorithm::Sha256, HashAlgorithm::Sha512];

impl CertificateIndex {
    /// # Errors
    ///
    /// Never fails for the indexed algorithms; the `Result` carries hashing errors through.
    pub fn build(store: CertificateStore) -> Result<Self, StatusError> {
        let mut hashes = HashSet::with_capacity(store.len() * INDEXED_ALGORITHMS.len());
        for cert in &store {
            for algorithm in INDEXED_ALGORITHMS {
                hashes.insert(hash_certificate(cert, algorithm)?);
            }
        }
        Ok(Self { store, hashes })
    }

    #[must_use]
    pub const fn store(&self) -> &CertificateStore {
        &self.store
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl CertificateSet for CertificateIndex {
    fn contains_hash(&self, candidate: &CertificateHash) -> Result<bool, StatusError> {
        if INDEXED_ALGORITHMS.contains(&candidate.algorithm) {
            Ok(self.hashes.contains(candidate))
        } else {
            self.store.contains_hash(candidate)
        }
    }
}

/// Issue `cert` under `issuer`: records the issuer by its default-algorithm
/// hash and signs the certificate digest without signature.
///
/// # Errors
///
/// Propagates hashing errors.
pub fn sign_certificate(
    mut cert: Certificate,
    issuer: &Certificate,
    issuer_key: &SigningKey,
) -> Result<Certificate, StatusError> {
    cert.issuer = Some(hash_certificate(issuer, DEFAULT_HASH_ALGORITHM)?);
    cert.issuer_signature = sign(&certificate_digest(&cert, false), issuer_key).to_vec();
    Ok(cert)
}

/// Checks `cert.issuer_signature` against `issuer`'s signing key. Does not
/// check that `cert.issuer` actually names `issuer`.
#[must_use]
pub fn verify_issuer_signature(cert: &Certificate, issuer: &Certificate) -> bool {
    verify(&certificate_digest(cert, false), &cert.issuer_signature, &issuer.signing_public_key)
}

impl PinnedCertificateStore {
    #[must_use]
    pub const fn new(pinned_certificates: Vec<PinnedCertificate>) -> Self {
        Self { pinned_certificates }
    }

    #[must_use]
    pub fn pin_for(&self, subject: &str) -> Option<&PinnedCertificate> {
        self.pinned_certificates.iter().find(|p| p.subject == subject)
    }

    /// A certificate is pinned when one of its subjects carries a pin that
    /// its hash matches.
    ///
    /// # Errors
    ///
    /// Propagates [`matches`] errors for the pins that apply.
    pub fn is_pinned(&self, cert: &Certificate) -> Result<bool, StatusError> {
        for subject in &cert.subjects {
            if let Some(pin) = self.pin_for(subject) {
                if matches(cert, &pin.certificate)? {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}
