//! User HTTP handlers: signup, login, role update, email verification.

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use crate::{
    AppState,
    error::AppError,
    middleware::auth::{AuthContext, authorize},
    models::user::{
        CreateUserRequest, LoginUserRequest, LoginUserResponse, UpdateUserRoleRequest, User,
        UserResponse, UserRole, VerifyEmailRequest, validate_username,
    },
    store::{
        create_user_tx::{AfterCreateFn, CreateUserTxParams},
        sessions,
        sessions::CreateSessionParams,
        users,
        users::CreateUserParams,
        verify_email_tx::VerifyEmailTxParams,
    },
    util::{password, random::SECRET_CODE_LENGTH},
    worker::{SendVerifyEmailPayload, TaskOptions},
};

/// Create a user (signup).
///
/// # Endpoint
///
/// `POST /api/v1/users`
///
/// The user insert and the enqueue of the verification-email task run
/// in one database transaction: if the task cannot be accepted, the
/// user is not created. A taken username or email returns 409 Conflict.
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    request.validate()?;

    let hashed_password = password::hash_password(&request.password)?;

    // The side effect runs inside the insert's transaction; its failure
    // rolls the user back.
    let distributor = Arc::clone(&state.distributor);
    let after_create: AfterCreateFn = Box::new(move |user: User| {
        Box::pin(async move {
            distributor
                .distribute_send_verify_email(
                    SendVerifyEmailPayload {
                        username: user.username,
                    },
                    TaskOptions::default(),
                )
                .await
        })
    });

    let user = state
        .store
        .create_user_tx(CreateUserTxParams {
            create_user: CreateUserParams {
                username: request.username,
                hashed_password,
                full_name: request.full_name,
                email: request.email,
            },
            after_create,
        })
        .await
        .map_err(|err| match err {
            AppError::Conflict(_) => {
                AppError::Conflict("username or email already exists".to_string())
            }
            other => other,
        })?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Log in and open a session.
///
/// # Endpoint
///
/// `POST /api/v1/users/login`
///
/// Issues an access token and a refresh token; the refresh token's id
/// becomes the session id. Unknown usernames and wrong passwords both
/// return the same 401.
pub async fn login_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<LoginUserRequest>,
) -> Result<Json<LoginUserResponse>, AppError> {
    let user = users::get_user(state.store.pool(), &request.username)
        .await
        .map_err(|err| match err {
            AppError::NotFound(_) => {
                AppError::Unauthorized("incorrect username or password".to_string())
            }
            other => other,
        })?;

    password::verify_password(&request.password, &user.hashed_password)?;

    let (access_token, access_payload) = state.token_maker.create_token(
        &user.username,
        user.role,
        state.config.access_token_duration(),
    )?;
    let (refresh_token, refresh_payload) = state.token_maker.create_token(
        &user.username,
        user.role,
        state.config.refresh_token_duration(),
    )?;

    let session = sessions::create_session(
        state.store.pool(),
        &CreateSessionParams {
            id: refresh_payload.id,
            username: user.username.clone(),
            refresh_token: refresh_token.clone(),
            user_agent: header_value(&headers, "user-agent"),
            client_ip: header_value(&headers, "x-forwarded-for"),
            expires_at: refresh_payload.expired_at,
        },
    )
    .await?;

    Ok(Json(LoginUserResponse {
        session_id: session.id,
        access_token,
        access_token_expires_at: access_payload.expired_at,
        refresh_token,
        refresh_token_expires_at: refresh_payload.expired_at,
        user: user.into(),
    }))
}

fn header_value(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Verify an email address with a one-time code.
///
/// # Endpoint
///
/// `POST /api/v1/users/verify_email`
///
/// A used, expired, or mismatched code returns 400; the response never
/// discloses which check failed first.
pub async fn verify_email(
    State(state): State<AppState>,
    Json(request): Json<VerifyEmailRequest>,
) -> Result<Json<UserResponse>, AppError> {
    validate_username(&request.username)?;
    if request.secret_code.len() != SECRET_CODE_LENGTH {
        return Err(AppError::Invalid(
            "verification code is invalid".to_string(),
        ));
    }

    let result = state
        .store
        .verify_email_tx(VerifyEmailTxParams {
            username: request.username,
            secret_code: request.secret_code,
        })
        .await?;

    Ok(Json(result.user.into()))
}

/// Re-enqueue the verification email for the authenticated user.
///
/// # Endpoint
///
/// `POST /api/v1/users/resend_verify_email`
///
/// Explicit resend requests go to the critical queue with an elevated
/// retry budget.
pub async fn resend_verify_email(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<StatusCode, AppError> {
    let user = users::get_user(state.store.pool(), &auth.username).await?;
    if user.is_email_verified {
        return Err(AppError::Invalid("email is already verified".to_string()));
    }

    state
        .distributor
        .distribute_send_verify_email(
            SendVerifyEmailPayload {
                username: user.username,
            },
            TaskOptions::critical(),
        )
        .await?;

    Ok(StatusCode::ACCEPTED)
}

/// Update a user's role.
///
/// # Endpoint
///
/// `PATCH /api/v1/users/role` (banker only)
pub async fn update_user_role(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<UpdateUserRoleRequest>,
) -> Result<Json<UserResponse>, AppError> {
    authorize(&auth, &[UserRole::Banker])?;
    validate_username(&request.username)?;

    let user =
        users::update_user_role(state.store.pool(), &request.username, request.role).await?;

    Ok(Json(user.into()))
}
