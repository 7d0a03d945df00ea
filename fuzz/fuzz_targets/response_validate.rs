#![no_main]

use libfuzzer_sys::fuzz_target;
use nstp_cert_status::{
    verify_response_signature, Certificate, CertificateHash, CertificateStatus, CertificateStatusResponse,
    CertificateStore, CertificateUsage, HashAlgorithm, ResponseValidator,
};

fuzz_target!(|data: &[u8]| {
    // Need enough data for all fixed-width response fields
    if data.len() < 4 + 4 + 8 + 4 + 32 + 64 { return; }

    let mut offset = 0;
    let algorithm = HashAlgorithm::from_code(i32::from_be_bytes(data[offset..offset+4].try_into().unwrap_or([0u8; 4])));
    offset += 4;
    let status = CertificateStatus::from_code(i32::from_be_bytes(data[offset..offset+4].try_into().unwrap_or([0u8; 4])));
    offset += 4;
    let valid_from = i64::from_be_bytes(data[offset..offset+8].try_into().unwrap_or([0u8; 8]));
    offset += 8;
    let valid_length = i32::from_be_bytes(data[offset..offset+4].try_into().unwrap_or([0u8; 4]));
    offset += 4;
    let signing_public_key: [u8; 32] = data[offset..offset+32].try_into().unwrap_or([0u8; 32]);
    offset += 32;
    let status_signature = data[offset..offset+64].to_vec();
    offset += 64;
    let value = data[offset..].to_vec();

    let response = CertificateStatusResponse {
        certificate: CertificateHash::new(algorithm, value.clone()),
        status,
        valid_from,
        valid_length,
        status_certificate: Certificate {
            subjects: vec!["status.example".into()],
            usages: vec![CertificateUsage::StatusSigning],
            signing_public_key,
            issuer: Some(CertificateHash::new(algorithm, value.clone())),
            ..Certificate::default()
        },
        status_signature,
    };

    let validator = ResponseValidator::new(CertificateStore::default(), vec!["status.example".into()]);
    let requested = CertificateHash::new(algorithm, value);

    // Nothing is trusted, so every input must be rejected without panicking.
    let _ = verify_response_signature(&response);
    assert!(validator.validate(&response, &requested, valid_from).is_err());
});
