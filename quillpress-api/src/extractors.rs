/// Authenticated-user request extractors
///
/// Handlers declare their auth requirement through their signature:
///
/// - [`CurrentUser`]: the request must carry a valid access token for an
///   active user; anything else is rejected before the handler runs.
/// - [`MaybeUser`]: anonymous requests pass through with `None`, but a
///   PRESENT credential is still fully validated: a bad token is a 401 even
///   on endpoints that would have served an anonymous caller. Credentials
///   are never silently ignored.
///
/// # Example
///
/// ```ignore
/// async fn profile(CurrentUser(auth): CurrentUser) -> String {
///     format!("hello {}", auth.username)
/// }
/// ```

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use quillpress_shared::auth::middleware::{authenticate, bearer_token, AuthContext, AuthError};

use crate::{app::AppState, error::ApiError};

/// Extractor requiring a valid access token
pub struct CurrentUser(pub AuthContext);

/// Extractor for endpoints that serve anonymous callers too
pub struct MaybeUser(pub Option<AuthContext>);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let auth = authenticate(&state.db, token, state.jwt_secret()).await?;

        Ok(CurrentUser(auth))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(&parts.headers) {
            Err(AuthError::MissingCredentials) => Ok(MaybeUser(None)),
            Err(other) => Err(other.into()),
            Ok(token) => {
                let auth = authenticate(&state.db, token, state.jwt_secret()).await?;
                Ok(MaybeUser(Some(auth)))
            }
        }
    }
}
