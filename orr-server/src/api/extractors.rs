//! Custom Axum extractors for request authentication.
//!
//! Provides:
//! - `ModeratorAuth` — verifies the `Orr-Moderator-Authorization` header
//!   against the argon2-hashed moderator secret (review endpoints).
//! - `SubmitterIdentity` — verifies the `Orr-Identity` token minted by the
//!   external identity provider and yields the authenticated identity
//!   string (submission endpoints).
//!
//! Token cryptography is delegated to [`orr_sdk::signature`].

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use orr_sdk::objects::ErrorBody;
use orr_sdk::signature::{IDENTITY_HEADER, MODERATOR_AUTH_HEADER, TokenError, verify_identity};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// ModeratorAuth — review endpoints
// ---------------------------------------------------------------------------

/// An Axum extractor that admits only callers presenting the moderator
/// secret.
pub struct ModeratorAuth;

/// Errors returned by the [`ModeratorAuth`] extractor.
///
/// Every variant maps to 403: the review surface does not distinguish a
/// missing credential from a wrong one.
#[derive(Debug)]
pub enum ModeratorAuthError {
    MissingHeader,
    InvalidHeader,
    Forbidden,
}

impl IntoResponse for ModeratorAuthError {
    fn into_response(self) -> Response {
        let details = match self {
            ModeratorAuthError::MissingHeader => "missing Orr-Moderator-Authorization header",
            ModeratorAuthError::InvalidHeader => "invalid Orr-Moderator-Authorization header",
            ModeratorAuthError::Forbidden => "moderator authorization failed",
        };
        (
            StatusCode::FORBIDDEN,
            Json(ErrorBody::with_details("unauthorized", details)),
        )
            .into_response()
    }
}

impl FromRequestParts<AppState> for ModeratorAuth {
    type Rejection = ModeratorAuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(MODERATOR_AUTH_HEADER)
            .ok_or(ModeratorAuthError::MissingHeader)?
            .to_str()
            .map_err(|_| ModeratorAuthError::InvalidHeader)?;

        let moderator = state.config.moderator.read().await;
        if !moderator.verify(presented) {
            return Err(ModeratorAuthError::Forbidden);
        }

        Ok(ModeratorAuth)
    }
}

// ---------------------------------------------------------------------------
// SubmitterIdentity — submission endpoints
// ---------------------------------------------------------------------------

/// An Axum extractor that verifies the `Orr-Identity` token and yields
/// the authenticated submitter identity.
pub struct SubmitterIdentity(pub String);

/// Errors returned by the [`SubmitterIdentity`] extractor.
#[derive(Debug)]
pub enum SubmitterIdentityError {
    MissingHeader,
    InvalidHeader,
    Token(TokenError),
}

impl IntoResponse for SubmitterIdentityError {
    fn into_response(self) -> Response {
        let details = match self {
            SubmitterIdentityError::MissingHeader => "missing Orr-Identity header".to_owned(),
            SubmitterIdentityError::InvalidHeader => "invalid Orr-Identity header".to_owned(),
            SubmitterIdentityError::Token(e) => e.to_string(),
        };
        (
            StatusCode::FORBIDDEN,
            Json(ErrorBody::with_details("unauthorized", details)),
        )
            .into_response()
    }
}

impl FromRequestParts<AppState> for SubmitterIdentity {
    type Rejection = SubmitterIdentityError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(IDENTITY_HEADER)
            .ok_or(SubmitterIdentityError::MissingHeader)?
            .to_str()
            .map_err(|_| SubmitterIdentityError::InvalidHeader)?;

        let identity_config = state.config.identity.read().await;
        let identity = verify_identity(header_value, identity_config.secret_bytes())
            .map_err(SubmitterIdentityError::Token)?;
        drop(identity_config);

        Ok(SubmitterIdentity(identity))
    }
}
