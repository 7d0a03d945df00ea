#![no_main]

use libfuzzer_sys::fuzz_target;
use nstp_cert_status::{
    certificate_digest, hash_certificate, Certificate, CertificateHash, CertificateUsage, HashAlgorithm,
};

const USAGES: [CertificateUsage; 4] = [
    CertificateUsage::CertificateSigning,
    CertificateUsage::ClientAuthentication,
    CertificateUsage::ServerAuthentication,
    CertificateUsage::StatusSigning,
];

fuzz_target!(|data: &[u8]| {
    // Fixed-width head, then split the tail into subject / signature halves.
    if data.len() < 8 + 4 + 1 + 32 + 32 + 1 { return; }

    let mut offset = 0;
    let valid_from = i64::from_be_bytes(data[offset..offset+8].try_into().unwrap_or([0u8; 8]));
    offset += 8;
    let valid_length = i32::from_be_bytes(data[offset..offset+4].try_into().unwrap_or([0u8; 4]));
    offset += 4;
    let flags = data[offset];
    offset += 1;
    let encryption_public_key: [u8; 32] = data[offset..offset+32].try_into().unwrap_or([0u8; 32]);
    offset += 32;
    let signing_public_key: [u8; 32] = data[offset..offset+32].try_into().unwrap_or([0u8; 32]);
    offset += 32;

    let tail = &data[offset..];
    let (subject_bytes, issuer_signature) = tail.split_at(tail.len() / 2);
    let subjects = String::from_utf8_lossy(subject_bytes)
        .split('\n')
        .map(str::to_owned)
        .collect();
    let usages = (0..(flags & 0x07)).map(|i| USAGES[usize::from(i) % USAGES.len()]).collect();
    let issuer = (flags & 0x80 != 0)
        .then(|| CertificateHash::new(HashAlgorithm::Sha256, encryption_public_key.to_vec()));

    let cert = Certificate {
        subjects,
        valid_from,
        valid_length,
        usages,
        encryption_public_key,
        signing_public_key,
        issuer,
        issuer_signature: issuer_signature.to_vec(),
    };

    let full = certificate_digest(&cert, true);
    let bare = certificate_digest(&cert, false);
    assert_eq!(full.len(), bare.len() + cert.issuer_signature.len());

    for algorithm in [HashAlgorithm::Sha256, HashAlgorithm::Sha512] {
        if let Ok(h) = hash_certificate(&cert, algorithm) {
            assert_eq!(cert.matches(&h), Ok(true));
        }
    }
});
