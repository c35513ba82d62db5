//! Identity-token signature scheme shared by the registry APIs.
//!
//! Submissions that act on behalf of a community member carry a token minted
//! by the identity provider in the `Orr-Identity` header:
//!
//! ```text
//! Orr-Identity: {unix_timestamp}.{base64_signature}.{identity}
//! ```
//!
//! The signature is `HMAC-SHA256("{identity}.{timestamp}", provider_secret)`.
//! The identity is an opaque subject string assigned by the provider and may
//! itself contain dots, which is why it is the final, greedy segment.

/// Header name for the submitter identity token.
pub const IDENTITY_HEADER: &str = "Orr-Identity";

/// Header name for moderator API authentication (plaintext secret).
pub const MODERATOR_AUTH_HEADER: &str = "Orr-Moderator-Authorization";

/// Maximum allowed age of an identity token (in seconds).
pub const MAX_TOKEN_AGE: i64 = 15 * 60;

/// Errors produced by identity-token operations.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid token format")]
    InvalidFormat,
    #[error("invalid base64 encoding")]
    InvalidBase64,
    #[error("invalid signature")]
    SignatureMismatch,
    #[error("token expired")]
    Expired,
}

impl From<ring::error::Unspecified> for TokenError {
    fn from(_: ring::error::Unspecified) -> Self {
        Self::SignatureMismatch
    }
}

/// Mint an identity token for `identity`, returning the full header value.
pub fn sign_identity(identity: &str, key: &[u8]) -> String {
    let timestamp = time::OffsetDateTime::now_utc().unix_timestamp();
    sign_identity_at(identity, timestamp, key)
}

/// Mint an identity token with an explicit timestamp.
pub fn sign_identity_at(identity: &str, timestamp: i64, key: &[u8]) -> String {
    let data = format!("{identity}.{timestamp}");
    let sig = ring::hmac::sign(
        &ring::hmac::Key::new(ring::hmac::HMAC_SHA256, key),
        data.as_bytes(),
    );
    format!(
        "{}.{}.{}",
        timestamp,
        fast32::base64::RFC4648_NOPAD.encode(sig.as_ref()),
        identity
    )
}

/// Verify an identity-token header value and return the authenticated
/// identity string.
pub fn verify_identity(header_value: &str, key: &[u8]) -> Result<String, TokenError> {
    let (timestamp, signature, identity) = parse_identity_header(header_value)?;
    let data = format!("{identity}.{timestamp}");
    ring::hmac::verify(
        &ring::hmac::Key::new(ring::hmac::HMAC_SHA256, key),
        data.as_bytes(),
        &signature,
    )?;
    check_timestamp(timestamp)?;
    Ok(identity)
}

/// Parse an `Orr-Identity` header value into `(timestamp, signature, identity)`.
pub fn parse_identity_header(value: &str) -> Result<(i64, Box<[u8]>, String), TokenError> {
    let mut parts = value.splitn(3, '.');
    let timestamp: i64 = parts
        .next()
        .ok_or(TokenError::InvalidFormat)?
        .parse()
        .map_err(|_| TokenError::InvalidFormat)?;
    let signature = fast32::base64::RFC4648_NOPAD
        .decode_str(parts.next().ok_or(TokenError::InvalidFormat)?)
        .map_err(|_| TokenError::InvalidBase64)?
        .into_boxed_slice();
    let identity = parts.next().ok_or(TokenError::InvalidFormat)?;
    if identity.is_empty() {
        return Err(TokenError::InvalidFormat);
    }
    Ok((timestamp, signature, identity.to_owned()))
}

/// Check that a token timestamp is within [`MAX_TOKEN_AGE`].
pub fn check_timestamp(timestamp: i64) -> Result<(), TokenError> {
    let now = time::OffsetDateTime::now_utc().unix_timestamp();
    if now - timestamp > MAX_TOKEN_AGE {
        return Err(TokenError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"provider-shared-secret";

    #[test]
    fn round_trip() {
        let token = sign_identity("auth0|5f2.user.182", KEY);
        let identity = verify_identity(&token, KEY).unwrap();
        assert_eq!(identity, "auth0|5f2.user.182");
    }

    #[test]
    fn tampered_identity_rejected() {
        let token = sign_identity("alice", KEY);
        let forged = token.replace("alice", "mallory");
        assert!(matches!(
            verify_identity(&forged, KEY),
            Err(TokenError::SignatureMismatch)
        ));
    }

    #[test]
    fn wrong_key_rejected() {
        let token = sign_identity("alice", KEY);
        assert!(matches!(
            verify_identity(&token, b"other-secret"),
            Err(TokenError::SignatureMismatch)
        ));
    }

    #[test]
    fn expired_token_rejected() {
        let stale = time::OffsetDateTime::now_utc().unix_timestamp() - MAX_TOKEN_AGE - 10;
        let token = sign_identity_at("alice", stale, KEY);
        assert!(matches!(
            verify_identity(&token, KEY),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn malformed_header_rejected() {
        assert!(matches!(
            verify_identity("not-a-token", KEY),
            Err(TokenError::InvalidFormat)
        ));
        assert!(matches!(
            verify_identity("123.!!!.alice", KEY),
            Err(TokenError::InvalidBase64)
        ));
    }
}
