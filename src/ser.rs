use crate::types::{Certificate, CertificateHash, CertificateStatusResponse};

#[inline]
#[must_use]
pub const fn be64(x: i64) -> [u8; 8] {
    x.to_be_bytes()
}

#[inline]
#[must_use]
pub const fn be32(x: i32) -> [u8; 4] {
    x.to_be_bytes()
}

/// Low byte of a protocol code, two's complement (so -1 encodes as 0xFF).
#[inline]
const fn code_byte(code: i32) -> u8 {
    code.to_le_bytes()[0]
}

fn write_certificate_hash(out: &mut Vec<u8>, hash: &CertificateHash) {
    out.extend_from_slice(&hash.value);
    out.push(code_byte(hash.algorithm.code()));
}

fn write_certificate(out: &mut Vec<u8>, cert: &Certificate, include_signature: bool) {
    // No length prefixes: subject boundaries are not recoverable from the
    // output and peers depend on exactly that.
    for subject in &cert.subjects {
        out.extend_from_slice(subject.as_bytes());
    }
    out.extend_from_slice(&be64(cert.valid_from));
    out.extend_from_slice(&be32(cert.valid_length));
    out.extend(cert.usages.iter().map(|u| u.code()));
    out.extend_from_slice(&cert.encryption_public_key);
    out.extend_from_slice(&cert.signing_public_key);
    if let Some(issuer) = &cert.issuer {
        write_certificate_hash(out, issuer);
    }
    if include_signature {
        out.extend_from_slice(&cert.issuer_signature);
    }
}

/// `value || algorithm code byte`
#[must_use]
pub fn certificate_hash_digest(hash: &CertificateHash) -> Vec<u8> {
    let mut v = Vec::with_capacity(hash.value.len() + 1);
    write_certificate_hash(&mut v, hash);
    v
}

/// Canonical certificate encoding. Order is fixed and there are no delimiters:
///
/// ```text
/// subjects || BE64(valid_from) || BE32(valid_length) || usage bytes ||
/// encryption key || signing key || [issuer hash digest] || [issuer signature]
/// ```
///
/// The issuer segment is omitted entirely when there is no issuer; the
/// signature segment only when `include_signature` is false.
#[must_use]
pub fn certificate_digest(cert: &Certificate, include_signature: bool) -> Vec<u8> {
    let mut v = Vec::with_capacity(digest_capacity(cert));
    write_certificate(&mut v, cert, include_signature);
    v
}

/// ```text
/// hash digest || status byte || BE64(valid_from) || BE32(valid_length) ||
/// status certificate digest without its issuer signature
/// ```
#[must_use]
pub fn response_digest(response: &CertificateStatusResponse) -> Vec<u8> {
    let mut v = Vec::with_capacity(
        response.certificate.value.len() + 1 + 1 + 8 + 4 + digest_capacity(&response.status_certificate),
    );
    write_certificate_hash(&mut v, &response.certificate);
    v.push(code_byte(response.status.code()));
    v.extend_from_slice(&be64(response.valid_from));
    v.extend_from_slice(&be32(response.valid_length));
    write_certificate(&mut v, &response.status_certificate, false);
    v
}

fn digest_capacity(cert: &Certificate) -> usize {
    cert.subjects.iter().map(String::len).sum::<usize>()
        + 8 + 4
        + cert.usages.len()
        + 2 * crate::types::PUBLIC_KEY_LEN
        + cert.issuer.as_ref().map_or(0, |h| h.value.len() + 1)
        + cert.issuer_signature.len()
}
