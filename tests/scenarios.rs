//! End-to-end responder scenarios.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use nstp_cert_status::*;
use rand_core::OsRng;
use sha2::{Digest, Sha256};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

const NOW: i64 = 1_700_000_000;

fn template(subject: &str, usages: Vec<CertificateUsage>) -> Certificate {
    Certificate {
        subjects: vec![subject.into()],
        valid_from: NOW - 3_600,
        valid_length: 31_536_000,
        usages,
        encryption_public_key: [7; 32],
        ..Certificate::default()
    }
}

struct Fixture {
    ca: Certificate,
    status_key: PrivateKey,
}

fn fixture() -> Fixture {
    let ca = PrivateKey::generate(template("ca.example", vec![CertificateUsage::CertificateSigning]), &mut OsRng);
    let status = PrivateKey::generate(template("status.example", vec![CertificateUsage::StatusSigning]), &mut OsRng);
    let issued = sign_certificate(status.certificate.clone(), &ca.certificate, &ca.signing_key().unwrap()).unwrap();
    let status_key = PrivateKey::new(issued, &status.signing_key().unwrap());
    Fixture { ca: ca.certificate, status_key }
}

fn config(f: &Fixture, allow: Vec<Certificate>, deny: Vec<Certificate>) -> ResponderConfig {
    ResponderConfig::new(
        f.status_key.certificate.clone(),
        &f.status_key,
        CertificateStore::new(allow),
        CertificateStore::new(deny),
    )
    .unwrap()
}

fn request_for(cert: &Certificate) -> CertificateStatusRequest {
    CertificateStatusRequest { certificate: cert.hash(HashAlgorithm::Sha512).unwrap() }
}

#[test]
fn example_org_hash_matches_hand_built_digest() {
    let cert = Certificate {
        subjects: vec!["example.org".into()],
        valid_from: 1_700_000_000,
        valid_length: 31_536_000,
        usages: vec![CertificateUsage::ServerAuthentication],
        encryption_public_key: [0x01; 32],
        signing_public_key: [0x02; 32],
        issuer: None,
        issuer_signature: Vec::new(),
    };

    let mut bytes = b"example.org".to_vec();
    bytes.extend_from_slice(&1_700_000_000i64.to_be_bytes());
    bytes.extend_from_slice(&31_536_000i32.to_be_bytes());
    bytes.push(CertificateUsage::ServerAuthentication.code());
    bytes.extend_from_slice(&[0x01; 32]);
    bytes.extend_from_slice(&[0x02; 32]);

    let h = hash_certificate(&cert, HashAlgorithm::Sha256).unwrap();
    assert_eq!(h.algorithm, HashAlgorithm::Sha256);
    assert_eq!(h.value, Sha256::digest(&bytes).to_vec());
}

#[test]
fn unlisted_certificate_gets_unknown_signed_response() {
    let f = fixture();
    let cfg = config(&f, vec![], vec![]);
    let request = request_for(&template("stranger.example", vec![]));

    let response = ResponseStrategy::Valid
        .respond(&request, &cfg, NOW, &mut rand::thread_rng())
        .unwrap()
        .expect("valid strategy always answers");

    assert_eq!(response.status, CertificateStatus::Unknown);
    assert_eq!(response.valid_length, 10);
    assert_eq!(response.certificate, request.certificate);
    assert!(verify(
        &response_digest(&response),
        &response.status_signature,
        &response.status_certificate.signing_public_key,
    ));

    let validator = ResponseValidator::new(CertificateStore::new(vec![f.ca]), vec!["status.example".into()]);
    assert_eq!(validator.validate(&response, &request.certificate, NOW), Ok(()));
}

#[test]
fn listed_certificates_get_their_status() {
    let f = fixture();
    let good = template("good.example", vec![CertificateUsage::ClientAuthentication]);
    let bad = template("bad.example", vec![CertificateUsage::ClientAuthentication]);
    let cfg = config(&f, vec![good.clone(), bad.clone()], vec![bad.clone()]);

    let good_resp = assemble_valid_response(&request_for(&good), &cfg, NOW).unwrap();
    let bad_resp = assemble_valid_response(&request_for(&bad), &cfg, NOW).unwrap();
    assert_eq!(good_resp.status, CertificateStatus::Valid);
    assert_eq!(bad_resp.status, CertificateStatus::Revoked);
}

#[test]
fn sha256_requests_are_answered_too() {
    let f = fixture();
    let good = template("good.example", vec![]);
    let cfg = config(&f, vec![good.clone()], vec![]);
    let request = CertificateStatusRequest { certificate: good.hash(HashAlgorithm::Sha256).unwrap() };
    let response = assemble_valid_response(&request, &cfg, NOW).unwrap();
    assert_eq!(response.status, CertificateStatus::Valid);
}

#[test]
fn unrecognized_request_algorithm_is_an_error() {
    let f = fixture();
    let cfg = config(&f, vec![template("good.example", vec![])], vec![]);
    let request = CertificateStatusRequest {
        certificate: CertificateHash::new(HashAlgorithm::Unrecognized(5), vec![1; 64]),
    };
    assert_eq!(
        assemble_valid_response(&request, &cfg, NOW),
        Err(StatusError::InvalidAlgorithm(5))
    );
}

#[test]
fn ignoring_strategy_sends_nothing() {
    let f = fixture();
    let cfg = config(&f, vec![], vec![]);
    let request = request_for(&template("any.example", vec![]));
    assert_eq!(ResponseStrategy::Ignoring.respond_with_thread_rng(&request, &cfg, NOW), Ok(None));
}

#[test]
fn pinned_status_certificate_is_trusted_without_issuer() {
    let status = PrivateKey::generate(template("status.example", vec![CertificateUsage::StatusSigning]), &mut OsRng);
    let cfg = ResponderConfig::new(
        status.certificate.clone(),
        &status,
        CertificateStore::default(),
        CertificateStore::default(),
    )
    .unwrap();
    let request = request_for(&template("any.example", vec![]));
    let response = assemble_valid_response(&request, &cfg, NOW).unwrap();

    let unpinned = ResponseValidator::new(CertificateStore::default(), vec!["status.example".into()]);
    assert_eq!(
        unpinned.validate(&response, &request.certificate, NOW),
        Err(ResponseDefect::UntrustedIssuer)
    );

    let pinned = unpinned.with_pinned(PinnedCertificateStore::new(vec![PinnedCertificate {
        subject: "status.example".into(),
        certificate: status.certificate.hash(HashAlgorithm::Sha256).unwrap(),
    }]));
    assert_eq!(pinned.validate(&response, &request.certificate, NOW), Ok(()));
}

#[test]
fn pins_do_not_anchor_certificates_from_unknown_issuers() {
    let f = fixture();
    let cfg = config(&f, vec![], vec![]);
    let request = request_for(&template("any.example", vec![]));
    let response = assemble_valid_response(&request, &cfg, NOW).unwrap();

    let pins = PinnedCertificateStore::new(vec![PinnedCertificate {
        subject: "status.example".into(),
        certificate: f.status_key.certificate.hash(HashAlgorithm::Sha512).unwrap(),
    }]);
    let without_ca =
        ResponseValidator::new(CertificateStore::default(), vec!["status.example".into()]).with_pinned(pins.clone());
    assert_eq!(
        without_ca.validate(&response, &request.certificate, NOW),
        Err(ResponseDefect::UntrustedIssuer)
    );

    let with_ca =
        ResponseValidator::new(CertificateStore::new(vec![f.ca.clone()]), vec!["status.example".into()]).with_pinned(pins);
    assert_eq!(with_ca.validate(&response, &request.certificate, NOW), Ok(()));
}

#[test]
fn tampered_self_signature_on_pinned_root_is_a_signature_defect() {
    let status = PrivateKey::generate(template("status.example", vec![CertificateUsage::StatusSigning]), &mut OsRng);
    let key = status.signing_key().unwrap();
    let cfg = ResponderConfig::new(status.certificate.clone(), &status, CertificateStore::default(), CertificateStore::default())
        .unwrap();
    let request = request_for(&template("any.example", vec![]));
    let validator = ResponseValidator::new(CertificateStore::default(), vec!["status.example".into()]).with_pinned(
        PinnedCertificateStore::new(vec![PinnedCertificate {
            subject: "status.example".into(),
            certificate: status.certificate.hash(HashAlgorithm::Sha512).unwrap(),
        }]),
    );

    let mut response = assemble_valid_response(&request, &cfg, NOW).unwrap();
    response.status_certificate.issuer_signature = sign(b"not the certificate", &key).to_vec();
    sign_response(&mut response, &key);
    assert_eq!(
        validator.validate(&response, &request.certificate, NOW),
        Err(ResponseDefect::BadIssuerSignature)
    );
}

#[test]
fn status_certificate_without_status_usage_is_rejected() {
    let ca = PrivateKey::generate(template("ca.example", vec![CertificateUsage::CertificateSigning]), &mut OsRng);
    let server = PrivateKey::generate(template("status.example", vec![CertificateUsage::ServerAuthentication]), &mut OsRng);
    let issued = sign_certificate(server.certificate.clone(), &ca.certificate, &ca.signing_key().unwrap()).unwrap();
    let key = PrivateKey::new(issued.clone(), &server.signing_key().unwrap());
    let cfg = ResponderConfig::new(issued, &key, CertificateStore::default(), CertificateStore::default()).unwrap();

    let request = request_for(&template("any.example", vec![]));
    let response = assemble_valid_response(&request, &cfg, NOW).unwrap();
    let validator = ResponseValidator::new(CertificateStore::new(vec![ca.certificate]), vec!["status.example".into()]);
    assert_eq!(
        validator.validate(&response, &request.certificate, NOW),
        Err(ResponseDefect::MissingStatusUsage)
    );
}

#[test]
fn stale_response_is_rejected_after_window() {
    let f = fixture();
    let cfg = config(&f, vec![], vec![]);
    let request = request_for(&template("any.example", vec![]));
    let response = assemble_valid_response(&request, &cfg, NOW).unwrap();
    let validator = ResponseValidator::new(CertificateStore::new(vec![f.ca]), vec!["status.example".into()]);

    assert_eq!(validator.validate(&response, &request.certificate, NOW + 10), Ok(()));
    assert_eq!(
        validator.validate(&response, &request.certificate, NOW + 11),
        Err(ResponseDefect::Expired)
    );
}

struct WarnCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[test]
fn identity_hashing_warns_every_time() {
    let warnings = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter(Arc::clone(&warnings)));

    tracing::subscriber::with_default(subscriber, || {
        let cert = template("debug.example", vec![]);
        let first = hash_certificate(&cert, HashAlgorithm::Identity).unwrap();
        let second = hash_certificate(&cert, HashAlgorithm::Identity).unwrap();
        assert_eq!(first.value, certificate_digest(&cert, true));
        assert_eq!(first, second);
        let _ = hash(b"sha", HashAlgorithm::Sha256).unwrap();
    });

    assert_eq!(warnings.load(Ordering::SeqCst), 2);
}
