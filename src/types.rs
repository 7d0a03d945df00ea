use core::fmt;
use core::hash::{Hash, Hasher};

pub const PUBLIC_KEY_LEN: usize = 32;        // Ed25519 / X25519 public keys
pub const SIGNATURE_LEN: usize = 64;         // Ed25519 signature
pub const SHA256_LEN: usize = 32;
pub const SHA512_LEN: usize = 64;
pub const STATUS_VALID_LENGTH: i32 = 10;     // freshness window of a status attestation, seconds
pub const DEFAULT_HASH_ALGORITHM: HashAlgorithm = HashAlgorithm::Sha512;

/// Raw 32-byte public key as carried in a certificate.
pub type PublicKey = [u8; PUBLIC_KEY_LEN];

/// Hash algorithm numbering of NSTP v4.
///
/// Codes outside the published table are kept as `Unrecognized` so that a
/// decoded value can round-trip, but hashing with one always fails.
/// Equality and hashing go through [`HashAlgorithm::code`].
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HashAlgorithm {
    #[default]
    Identity,
    Sha256,
    Sha512,
    Unrecognized(i32),
}

impl HashAlgorithm {
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Identity => 0,
            Self::Sha256 => 1,
            Self::Sha512 => 2,
            Self::Unrecognized(code) => code,
        }
    }

    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Identity,
            1 => Self::Sha256,
            2 => Self::Sha512,
            other => Self::Unrecognized(other),
        }
    }
}

impl PartialEq for HashAlgorithm {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

impl Eq for HashAlgorithm {}

impl Hash for HashAlgorithm {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code().hash(state);
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => f.write_str("identity"),
            Self::Sha256 => f.write_str("sha256"),
            Self::Sha512 => f.write_str("sha512"),
            Self::Unrecognized(code) => write!(f, "unrecognized({code})"),
        }
    }
}

/// What a certificate may be used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum CertificateUsage {
    CertificateSigning = 0,
    ClientAuthentication = 1,
    ServerAuthentication = 2,
    StatusSigning = 3,
}

impl CertificateUsage {
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Status carried by a response. `Unrecognized` only ever appears on the
/// wire or in deliberately corrupted responses.
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CertificateStatus {
    #[default]
    Unknown,
    Valid,
    Revoked,
    Unrecognized(i32),
}

impl CertificateStatus {
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Unknown => 0,
            Self::Valid => 1,
            Self::Revoked => 2,
            Self::Unrecognized(code) => code,
        }
    }

    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Unknown,
            1 => Self::Valid,
            2 => Self::Revoked,
            other => Self::Unrecognized(other),
        }
    }

    #[must_use]
    pub const fn is_recognized(self) -> bool {
        !matches!(Self::from_code(self.code()), Self::Unrecognized(_))
    }
}

impl PartialEq for CertificateStatus {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

impl Eq for CertificateStatus {}

/// Identifies a certificate by digest rather than by content.
///
/// The default value (`IDENTITY`, empty) stands for an absent hash.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CertificateHash {
    pub algorithm: HashAlgorithm,
    pub value: Vec<u8>,
}

impl CertificateHash {
    #[must_use]
    pub const fn new(algorithm: HashAlgorithm, value: Vec<u8>) -> Self {
        Self { algorithm, value }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl fmt::Display for CertificateHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, hex::encode(&self.value))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Certificate {
    pub subjects: Vec<String>,
    pub valid_from: i64,      // seconds since epoch
    pub valid_length: i32,    // seconds
    pub usages: Vec<CertificateUsage>,
    pub encryption_public_key: PublicKey,
    pub signing_public_key: PublicKey,
    /// Issuer referenced by hash, never embedded.
    pub issuer: Option<CertificateHash>,
    pub issuer_signature: Vec<u8>,
}

/// Signing key material paired with the certificate it belongs to.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrivateKey {
    pub certificate: Certificate,
    /// 32-byte seed or 64-byte seed||public key form.
    pub signing_private_key: Vec<u8>,
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("certificate", &self.certificate)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CertificateStatusRequest {
    pub certificate: CertificateHash,
}

/// `valid_from`/`valid_length` describe the freshness window of this
/// attestation, not the validity of the queried certificate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CertificateStatusResponse {
    pub certificate: CertificateHash,
    pub status: CertificateStatus,
    pub valid_from: i64,
    pub valid_length: i32,
    pub status_certificate: Certificate,
    pub status_signature: Vec<u8>,
}

/// Flat list of certificates used as an allow or deny set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CertificateStore {
    pub certificates: Vec<Certificate>,
}

impl CertificateStore {
    #[must_use]
    pub const fn new(certificates: Vec<Certificate>) -> Self {
        Self { certificates }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Certificate> {
        self.certificates.iter()
    }
}

impl From<Vec<Certificate>> for CertificateStore {
    fn from(certificates: Vec<Certificate>) -> Self {
        Self { certificates }
    }
}

impl FromIterator<Certificate> for CertificateStore {
    fn from_iter<I: IntoIterator<Item = Certificate>>(iter: I) -> Self {
        Self { certificates: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a CertificateStore {
    type Item = &'a Certificate;
    type IntoIter = core::slice::Iter<'a, Certificate>;
    fn into_iter(self) -> Self::IntoIter {
        self.certificates.iter()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PinnedCertificate {
    pub subject: String,
    pub certificate: CertificateHash,
}

/// Subject-to-hash pins. Deliberately a different type from
/// [`CertificateStore`] so neither can stand in for the other.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PinnedCertificateStore {
    pub pinned_certificates: Vec<PinnedCertificate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_codes_follow_protocol_numbering() {
        assert_eq!(HashAlgorithm::Identity.code(), 0);
        assert_eq!(HashAlgorithm::Sha256.code(), 1);
        assert_eq!(HashAlgorithm::Sha512.code(), 2);
        assert_eq!(HashAlgorithm::from_code(7), HashAlgorithm::Unrecognized(7));
        // Same code, different spelling: still equal.
        assert_eq!(HashAlgorithm::Unrecognized(1), HashAlgorithm::Sha256);
    }

    #[test]
    fn status_recognition() {
        assert!(CertificateStatus::Revoked.is_recognized());
        assert!(!CertificateStatus::Unrecognized(-1).is_recognized());
        assert!(CertificateStatus::Unrecognized(2).is_recognized());
    }

    #[test]
    fn hash_display_is_algorithm_and_hex() {
        let h = CertificateHash::new(HashAlgorithm::Sha256, vec![0xde, 0xad]);
        assert_eq!(h.to_string(), "sha256:dead");
    }

    #[test]
    fn private_key_debug_hides_key_bytes() {
        let key = PrivateKey { certificate: Certificate::default(), signing_private_key: vec![0xAB; 32] };
        assert!(!format!("{key:?}").contains("171"));
    }
}
