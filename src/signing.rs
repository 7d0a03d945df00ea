use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand_core::CryptoRngCore;
use sha2::Sha512;
use crate::{errors::StatusError, types::{Certificate, PrivateKey, PUBLIC_KEY_LEN, SIGNATURE_LEN}};

/// Parse raw private key bytes: either a 32-byte seed or the 64-byte
/// `seed || public key` form. The 64-byte form is rejected when its halves disagree.
///
/// # Errors
///
/// Returns `StatusError::InvalidLength` for any other size and
/// `StatusError::InvalidKey` for an inconsistent keypair.
pub fn parse_signing_key(bytes: &[u8]) -> Result<SigningKey, StatusError> {
    match bytes.len() {
        32 => {
            let mut seed = [0u8; 32];
            seed.copy_from_slice(bytes);
            Ok(SigningKey::from_bytes(&seed))
        }
        64 => {
            let mut pair = [0u8; 64];
            pair.copy_from_slice(bytes);
            SigningKey::from_keypair_bytes(&pair)
                .map_err(|_| StatusError::InvalidKey("keypair public half does not match seed"))
        }
        got => Err(StatusError::InvalidLength { expected: 64, got }),
    }
}

/// Ed25519 signature over the whole message.
#[must_use]
pub fn sign(message: &[u8], key: &SigningKey) -> [u8; SIGNATURE_LEN] {
    key.sign(message).to_bytes()
}

/// Verify an Ed25519 signature. Malformed signatures or keys and plain
/// mismatches all come back as `false`.
#[must_use]
pub fn verify(message: &[u8], signature: &[u8], public_key: &[u8]) -> bool {
    let Ok(sig_bytes) = <[u8; SIGNATURE_LEN]>::try_from(signature) else { return false };
    let Ok(pk_bytes) = <[u8; PUBLIC_KEY_LEN]>::try_from(public_key) else { return false };
    let Ok(vk) = VerifyingKey::from_bytes(&pk_bytes) else { return false };
    vk.verify_strict(message, &Signature::from_bytes(&sig_bytes)).is_ok()
}

/// Ed25519ph over a message already absorbed into `prehashed`, with no
/// context string. This is what libsodium's multi-part
/// `crypto_sign_init`/`update`/`final_create` produces, so peers built on that
/// API verify it while rejecting [`sign`] output.
///
/// # Errors
///
/// Returns `StatusError::SigningFailed` if the prehashed signer rejects the input.
pub fn sign_prehashed(prehashed: Sha512, key: &SigningKey) -> Result<[u8; SIGNATURE_LEN], StatusError> {
    key.sign_prehashed(prehashed, None)
        .map(|sig| sig.to_bytes())
        .map_err(|_| StatusError::SigningFailed("ed25519ph"))
}

/// Counterpart of [`sign_prehashed`], strict like [`verify`].
#[must_use]
pub fn verify_prehashed(prehashed: Sha512, signature: &[u8], public_key: &[u8]) -> bool {
    let Ok(sig_bytes) = <[u8; SIGNATURE_LEN]>::try_from(signature) else { return false };
    let Ok(pk_bytes) = <[u8; PUBLIC_KEY_LEN]>::try_from(public_key) else { return false };
    let Ok(vk) = VerifyingKey::from_bytes(&pk_bytes) else { return false };
    vk.verify_prehashed_strict(prehashed, None, &Signature::from_bytes(&sig_bytes)).is_ok()
}

impl PrivateKey {
    /// Pair `key` with `certificate`. The certificate is taken as-is.
    #[must_use]
    pub fn new(certificate: Certificate, key: &SigningKey) -> Self {
        Self { certificate, signing_private_key: key.to_bytes().to_vec() }
    }

    /// Fresh key for `certificate`, whose `signing_public_key` is overwritten
    /// with the new public half.
    #[must_use]
    pub fn generate<R: CryptoRngCore + ?Sized>(mut certificate: Certificate, csprng: &mut R) -> Self {
        let key = SigningKey::generate(csprng);
        certificate.signing_public_key = key.verifying_key().to_bytes();
        Self::new(certificate, &key)
    }

    /// # Errors
    ///
    /// See [`parse_signing_key`].
    pub fn signing_key(&self) -> Result<SigningKey, StatusError> {
        parse_signing_key(&self.signing_private_key)
    }
}
