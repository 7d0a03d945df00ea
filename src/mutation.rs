//! The twelve ways the conformance fuzzer breaks a response.
//!
//! Every category but the last re-signs the mutated response correctly, so
//! the planted defect is the only thing a client can object to. The last
//! leaves the body intact and forges the outer signature instead.

use core::fmt;

use ed25519_dalek::SigningKey;
use rand::Rng;

use crate::{
    errors::StatusError,
    identity::hash_certificate,
    signing::sign,
    status::sign_response,
    types::{CertificateHash, CertificateStatus, CertificateStatusResponse, HashAlgorithm, DEFAULT_HASH_ALGORITHM},
    validation::ResponseDefect,
};

/// Bytes signed in place of the real digest when a signature is forged.
pub const DECOY_MESSAGE: &[u8] = b"foo";
pub const ONE_DAY_SECS: i64 = 86_400;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mutation {
    EmptyHash,
    ExtendedHashValue,
    SwappedHashAlgorithm,
    UnrecognizedStatus,
    NotYetValid,
    FarFutureValidity,
    Stale,
    JustExpired,
    ExtraStatusSubject,
    SelfIssuedStatusCertificate,
    ForgedIssuerSignature,
    ForgedResponseSignature,
}

impl Mutation {
    pub const COUNT: usize = 12;

    /// Indexed by category number.
    pub const ALL: [Self; Self::COUNT] = [
        Self::EmptyHash,
        Self::ExtendedHashValue,
        Self::SwappedHashAlgorithm,
        Self::UnrecognizedStatus,
        Self::NotYetValid,
        Self::FarFutureValidity,
        Self::Stale,
        Self::JustExpired,
        Self::ExtraStatusSubject,
        Self::SelfIssuedStatusCertificate,
        Self::ForgedIssuerSignature,
        Self::ForgedResponseSignature,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::COUNT { Some(Self::ALL[index]) } else { None }
    }

    /// Uniform draw over all categories.
    #[must_use]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::COUNT)]
    }

    /// Whether the outer signature is recomputed after mutating.
    #[must_use]
    pub const fn resigns(self) -> bool {
        !matches!(self, Self::ForgedResponseSignature)
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::EmptyHash => "empty hash",
            Self::ExtendedHashValue => "wrong hash",
            Self::SwappedHashAlgorithm => "opposite certificate hash algorithm",
            Self::UnrecognizedStatus => "unknown status value",
            Self::NotYetValid => "not valid yet",
            Self::FarFutureValidity => "not valid yet with a slight chance of overflow",
            Self::Stale => "not valid anymore (very old)",
            Self::JustExpired => "not valid anymore (expired a second ago)",
            Self::ExtraStatusSubject => "wrong status cert subjects",
            Self::SelfIssuedStatusCertificate => "wrong status cert hash (issuer is itself)",
            Self::ForgedIssuerSignature => "wrong status cert issuer signature",
            Self::ForgedResponseSignature => "response signature incorrect",
        }
    }

    /// The single rule a correct client rejects this mutation with.
    #[must_use]
    pub const fn expected_defect(self) -> ResponseDefect {
        match self {
            Self::EmptyHash => ResponseDefect::MissingCertificateHash,
            Self::ExtendedHashValue => ResponseDefect::CertificateHashMismatch,
            Self::SwappedHashAlgorithm => ResponseDefect::HashAlgorithmMismatch,
            Self::UnrecognizedStatus => ResponseDefect::UnrecognizedStatus,
            Self::NotYetValid => ResponseDefect::NotYetValid,
            Self::FarFutureValidity => ResponseDefect::ValidityOverflow,
            Self::Stale => ResponseDefect::Expired,
            Self::JustExpired => ResponseDefect::EmptyValidityWindow,
            Self::ExtraStatusSubject => ResponseDefect::StatusSubjectMismatch,
            Self::SelfIssuedStatusCertificate => ResponseDefect::UntrustedIssuer,
            Self::ForgedIssuerSignature => ResponseDefect::BadIssuerSignature,
            Self::ForgedResponseSignature => ResponseDefect::BadResponseSignature,
        }
    }

    /// Corrupt a correctly signed response in place, then fix up or forge
    /// the outer signature.
    ///
    /// # Errors
    ///
    /// Propagates hashing errors from re-hashing the status certificate.
    pub fn apply(self, response: &mut CertificateStatusResponse, key: &SigningKey) -> Result<(), StatusError> {
        match self {
            Self::EmptyHash => response.certificate = CertificateHash::default(),
            Self::ExtendedHashValue => response.certificate.value.extend_from_slice(DECOY_MESSAGE),
            Self::SwappedHashAlgorithm => {
                response.certificate.algorithm = swapped_algorithm(response.certificate.algorithm);
            }
            Self::UnrecognizedStatus => response.status = CertificateStatus::Unrecognized(-1),
            Self::NotYetValid => response.valid_from = response.valid_from.saturating_add(ONE_DAY_SECS),
            Self::FarFutureValidity => response.valid_from = i64::MAX - 1,
            Self::Stale => response.valid_from = response.valid_from.saturating_sub(ONE_DAY_SECS),
            Self::JustExpired => {
                response.valid_from = response.valid_from.saturating_sub(1);
                response.valid_length = 0;
            }
            Self::ExtraStatusSubject => response.status_certificate.subjects.push("foo".to_owned()),
            Self::SelfIssuedStatusCertificate => {
                let own = hash_certificate(&response.status_certificate, DEFAULT_HASH_ALGORITHM)?;
                response.status_certificate.issuer = Some(own);
            }
            Self::ForgedIssuerSignature => {
                response.status_certificate.issuer_signature = sign(DECOY_MESSAGE, key).to_vec();
            }
            Self::ForgedResponseSignature => {}
        }

        if self.resigns() {
            sign_response(response, key);
        } else {
            response.status_signature = sign(DECOY_MESSAGE, key).to_vec();
        }
        Ok(())
    }
}

/// A supported algorithm other than `algorithm`.
const fn swapped_algorithm(algorithm: HashAlgorithm) -> HashAlgorithm {
    match algorithm {
        HashAlgorithm::Sha512 => HashAlgorithm::Sha256,
        HashAlgorithm::Sha256 | HashAlgorithm::Identity | HashAlgorithm::Unrecognized(_) => HashAlgorithm::Sha512,
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
