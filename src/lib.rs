#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

//! NSTP v4 certificate status responder core
//!
//! This crate implements the cryptographic core of the NSTP certificate status
//! protocol: the canonical byte digests that everything is hashed and signed
//! over, hash-based certificate identity, Ed25519 status signing, the
//! allow/deny status decision, and a conformance fuzzer that plants exactly
//! one protocol violation per response to exercise client validation.

// Fixed choices of the wire contract:
// - Digest: order-sensitive, delimiter-free, big-endian integers
// - Hash: IDENTITY (debug only), SHA-256, SHA-512; default SHA-512
// - Signature: Ed25519, 64 bytes
// - Status freshness: 10 seconds
//
// Sockets, argument parsing and file loading belong to the embedding
// transport; everything here is pure and shares only immutable state.

pub mod types;
pub mod errors;
pub mod hashers;
pub mod signing;
pub mod ser;
pub mod identity;
pub mod status;
pub mod mutation;
pub mod responder;
pub mod validation;

pub use types::*;
pub use errors::StatusError;
pub use hashers::hash;
pub use signing::{parse_signing_key, sign, sign_prehashed, verify, verify_prehashed};
pub use ser::{certificate_digest, certificate_hash_digest, response_digest};
pub use identity::{
    hash_certificate, is_in, matches, sign_certificate, verify_issuer_signature, CertificateIndex,
    CertificateSet,
};
pub use status::{
    assemble_valid_response, decide, sign_response, unix_now, verify_response_signature,
    ResponderConfig,
};
pub use mutation::Mutation;
pub use responder::{build_invalid_response, build_mutated_response, ResponseStrategy};
pub use validation::{ResponseDefect, ResponseValidator};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PROTOCOL_VERSION: u32 = 4;
