//! Authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::auth::identity::Identity;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller, resolved by the state's [`IdentityVerifier`].
///
/// Use this as an extractor parameter in any handler that requires authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user = %user.identity, "handling request");
///     Ok(Json(()))
/// }
/// ```
///
/// [`IdentityVerifier`]: crate::auth::identity::IdentityVerifier
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub identity: Identity,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = state.identity.verify_identity(&parts.headers).await?;
        Ok(AuthUser { identity })
    }
}
