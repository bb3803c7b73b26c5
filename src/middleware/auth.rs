//! Bearer-token authentication middleware.
//!
//! This middleware intercepts every protected request to:
//! 1. Extract the access token from the Authorization header
//! 2. Verify its signature and expiry
//! 3. Inject the authenticated principal into the request
//! 4. Reject unauthorized requests with HTTP 401

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{AppState, error::AppError, models::user::UserRole, token::TokenError};

/// Authentication context attached to authenticated requests.
///
/// Inserted into the request's extension map; route handlers extract it
/// with `Extension<AuthContext>`. Store-level operations trust this
/// principal; all ownership checks happen against it.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub username: String,
    pub role: UserRole,
}

/// Bearer-token authentication middleware function.
///
/// # Flow
///
/// 1. Extract `Authorization: Bearer <token>` header
/// 2. Verify the token with the configured token maker
/// 3. If valid: inject [`AuthContext`], call the next handler
/// 4. If missing/expired/forged: return 401 Unauthorized
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("unsupported authorization format".to_string()))?;

    let payload = state.token_maker.verify_token(token).map_err(|err| {
        let message = match err {
            TokenError::Expired => "token has expired",
            _ => "token is invalid",
        };
        AppError::Unauthorized(message.to_string())
    })?;

    request.extensions_mut().insert(AuthContext {
        username: payload.username,
        role: payload.role,
    });

    Ok(next.run(request).await)
}

/// Check that the principal holds one of the allowed roles.
pub fn authorize(auth: &AuthContext, allowed: &[UserRole]) -> Result<(), AppError> {
    if allowed.contains(&auth.role) {
        Ok(())
    } else {
        Err(AppError::Unauthorized(
            "insufficient permissions".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorize_checks_role_membership() {
        let depositor = AuthContext {
            username: "alice_01".to_string(),
            role: UserRole::Depositor,
        };
        let banker = AuthContext {
            username: "boss".to_string(),
            role: UserRole::Banker,
        };

        assert!(authorize(&banker, &[UserRole::Banker]).is_ok());
        assert!(authorize(&depositor, &[UserRole::Banker]).is_err());
        assert!(authorize(&depositor, &[UserRole::Depositor, UserRole::Banker]).is_ok());
    }
}
