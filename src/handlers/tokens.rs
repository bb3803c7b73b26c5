//! Access-token renewal HTTP handler.

use axum::{Json, extract::State};
use chrono::Utc;

use crate::{
    AppState,
    error::AppError,
    models::session::{RenewAccessTokenRequest, RenewAccessTokenResponse},
    store::sessions,
};

/// Renew an access token from a refresh token.
///
/// # Endpoint
///
/// `POST /api/v1/tokens/renew_access`
///
/// # Session Checks
///
/// The refresh token must verify, and the session it names must be
/// unblocked, belong to the token's user, store this exact token, and
/// be unexpired. A well-formed refresh token that does not match the
/// stored one indicates a replayed or rotated-out token, so the session
/// is blocked before the request is rejected; the block latches and is
/// never reset.
pub async fn renew_access_token(
    State(state): State<AppState>,
    Json(request): Json<RenewAccessTokenRequest>,
) -> Result<Json<RenewAccessTokenResponse>, AppError> {
    let payload = state.token_maker.verify_token(&request.refresh_token)?;

    let session = sessions::get_session(state.store.pool(), payload.id).await?;

    if session.is_blocked {
        return Err(AppError::Unauthorized("session is blocked".to_string()));
    }
    if session.username != payload.username {
        return Err(AppError::Unauthorized(
            "session does not belong to this user".to_string(),
        ));
    }
    if session.refresh_token != request.refresh_token {
        sessions::block_session(state.store.pool(), session.id).await?;
        return Err(AppError::Unauthorized(
            "mismatched session token".to_string(),
        ));
    }
    if session.expires_at < Utc::now() {
        return Err(AppError::Unauthorized("session has expired".to_string()));
    }

    let (access_token, access_payload) = state.token_maker.create_token(
        &payload.username,
        payload.role,
        state.config.access_token_duration(),
    )?;

    Ok(Json(RenewAccessTokenResponse {
        access_token,
        access_token_expires_at: access_payload.expired_at,
    }))
}
