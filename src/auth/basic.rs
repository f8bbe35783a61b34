use base64::{
    alphabet,
    engine::{general_purpose::{GeneralPurpose, GeneralPurposeConfig}, DecodePaddingMode},
    Engine as _,
};
use tracing::warn;

use crate::config::BasicAuthConfig;
use crate::error::AuthError;

/// Standard alphabet, but trailing `=` padding is optional when decoding.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Username/password pair the gate accepts. Fixed for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl From<BasicAuthConfig> for Credential {
    fn from(config: BasicAuthConfig) -> Self {
        Self {
            username: config.username,
            password: config.password,
        }
    }
}

/// Stateless HTTP Basic authentication check against a single [`Credential`].
#[derive(Debug, Clone)]
pub struct BasicAuthGate {
    credential: Credential,
}

impl BasicAuthGate {
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }

    /// Decide on the raw `Authorization` header value.
    pub fn check(&self, header: Option<&str>) -> Result<(), AuthError> {
        let header = header.ok_or(AuthError::MissingHeader)?;
        let (username, password) = parse_basic_header(header)?;

        if username == self.credential.username
            && password.as_deref() == Some(self.credential.password.as_str())
        {
            Ok(())
        } else {
            warn!("Basic auth rejected for username: {}", username);
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// Split `Basic <base64>` into its decoded username and optional password.
///
/// The password is everything after the first `:`; it is `None` when the
/// decoded text has no `:` at all.
fn parse_basic_header(header: &str) -> Result<(String, Option<String>), AuthError> {
    let (scheme, encoded) = header.split_once(' ').ok_or(AuthError::MalformedHeader)?;
    if scheme != "Basic" || encoded.is_empty() || encoded.contains(' ') {
        return Err(AuthError::MalformedHeader);
    }

    let bytes = LENIENT
        .decode(encoded)
        .map_err(|_| AuthError::InvalidCredentials)?;
    let decoded = String::from_utf8_lossy(&bytes);

    Ok(match decoded.split_once(':') {
        Some((username, password)) => (username.to_string(), Some(password.to_string())),
        None => (decoded.into_owned(), None),
    })
}
