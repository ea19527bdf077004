use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::{
    clients::identity::IdentityError,
    errors::{Error, Result},
    models::user::RequesterIdentity,
    state::AppState,
};

/// Verifies the bearer ID token with the identity provider and stores the
/// resulting [`RequesterIdentity`] in the request extensions.
pub async fn validate_id_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let token = bearer_token(request.headers())?;

    let requester = state
        .identity
        .verify_id_token(token)
        .await
        .map_err(|err| match err {
            IdentityError::Rejected(reason) => {
                tracing::warn!("ID token rejected: {reason}");
                Error::InvalidToken
            }
            other => Error::from(other),
        })?;

    request.extensions_mut().insert(requester);
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    let header_value = headers
        .get(AUTHORIZATION)
        .ok_or(Error::MissingToken)?
        .to_str()
        .map_err(|_| Error::InvalidToken)?;

    let mut parts = header_value.trim().splitn(2, ' ');

    let scheme = parts.next().ok_or(Error::MissingToken)?;
    let token = parts.next().map(str::trim).unwrap_or_default();

    if scheme != "Bearer" {
        tracing::warn!("Invalid auth scheme: {scheme}");
        return Err(Error::InvalidScheme);
    }
    if token.is_empty() {
        return Err(Error::MissingToken);
    }

    Ok(token)
}

impl<S> FromRequestParts<S> for RequesterIdentity
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<RequesterIdentity>()
            .cloned()
            .ok_or(Error::MissingToken)
    }
}
