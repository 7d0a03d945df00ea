use core::{fmt, str::FromStr};

use rand::Rng;

use crate::{
    errors::StatusError,
    mutation::Mutation,
    status::{assemble_valid_response, ResponderConfig},
    types::{CertificateStatusRequest, CertificateStatusResponse},
};

/// How the responder answers. Chosen once at startup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ResponseStrategy {
    /// Correct, signed responses.
    #[default]
    Valid,
    /// No response at all; exercises client timeouts.
    Ignoring,
    /// One randomly chosen [`Mutation`] per response.
    Invalid,
}

impl ResponseStrategy {
    /// `Ok(None)` means send nothing.
    ///
    /// # Errors
    ///
    /// Propagates decision and hashing errors.
    pub fn respond<R: Rng + ?Sized>(
        self,
        request: &CertificateStatusRequest,
        config: &ResponderConfig,
        now: i64,
        rng: &mut R,
    ) -> Result<Option<CertificateStatusResponse>, StatusError> {
        match self {
            Self::Valid => assemble_valid_response(request, config, now).map(Some),
            Self::Ignoring => Ok(None),
            Self::Invalid => build_invalid_response(request, config, now, rng).map(|(_, r)| Some(r)),
        }
    }

    /// [`ResponseStrategy::respond`] with the thread-local generator.
    ///
    /// # Errors
    ///
    /// See [`ResponseStrategy::respond`].
    pub fn respond_with_thread_rng(
        self,
        request: &CertificateStatusRequest,
        config: &ResponderConfig,
        now: i64,
    ) -> Result<Option<CertificateStatusResponse>, StatusError> {
        self.respond(request, config, now, &mut rand::thread_rng())
    }
}

impl FromStr for ResponseStrategy {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "valid" => Ok(Self::Valid),
            "ignoring" => Ok(Self::Ignoring),
            "invalid" => Ok(Self::Invalid),
            _ => Err(StatusError::UnknownStrategy(s.to_owned())),
        }
    }
}

impl fmt::Display for ResponseStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Valid => "valid",
            Self::Ignoring => "ignoring",
            Self::Invalid => "invalid",
        })
    }
}

/// Draw a category and build the corrupted response. The category is
/// returned alongside so callers can record what was planted.
///
/// # Errors
///
/// Propagates decision and hashing errors.
pub fn build_invalid_response<R: Rng + ?Sized>(
    request: &CertificateStatusRequest,
    config: &ResponderConfig,
    now: i64,
    rng: &mut R,
) -> Result<(Mutation, CertificateStatusResponse), StatusError> {
    let mutation = Mutation::random(rng);
    let response = build_mutated_response(request, config, now, mutation)?;
    Ok((mutation, response))
}

/// Correct response for `request` with `mutation` applied.
///
/// # Errors
///
/// Propagates decision and hashing errors.
pub fn build_mutated_response(
    request: &CertificateStatusRequest,
    config: &ResponderConfig,
    now: i64,
    mutation: Mutation,
) -> Result<CertificateStatusResponse, StatusError> {
    let mut response = assemble_valid_response(request, config, now)?;
    mutation.apply(&mut response, config.signing_key())?;
    tracing::warn!(category = mutation.index(), "intentionally sent an invalid response message: {mutation}");
    Ok(response)
}
