//! Account management HTTP handlers.
//!
//! This module implements the account-related API endpoints:
//! - POST /api/v1/accounts - Create a new account
//! - GET /api/v1/accounts - List the authenticated user's accounts
//! - GET /api/v1/accounts/{id} - Get one account
//! - PUT /api/v1/accounts/{id}/balance - Direct balance adjustment (banker)
//! - DELETE /api/v1/accounts/{id} - Delete an account

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    error::AppError,
    middleware::auth::{AuthContext, authorize},
    models::{
        account::{Account, AdjustBalanceRequest, CreateAccountRequest},
        user::UserRole,
    },
    store::accounts,
    store::accounts::CreateAccountParams,
};

/// Create a new account owned by the authenticated user.
///
/// # Endpoint
///
/// `POST /api/v1/accounts`
///
/// The owner is always the authenticated principal; the balance starts
/// at zero. Each user may hold at most one account per currency, so a
/// second account in the same currency returns 409 Conflict.
pub async fn create_account(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<Account>), AppError> {
    let account = accounts::create_account(
        state.store.pool(),
        &CreateAccountParams {
            owner: auth.username,
            currency: request.currency,
            balance: 0,
        },
    )
    .await
    .map_err(|err| match err {
        AppError::Conflict(_) => AppError::Conflict(format!(
            "an account in {} already exists for this user",
            request.currency
        )),
        other => other,
    })?;

    Ok((StatusCode::CREATED, Json(account)))
}

/// List the authenticated user's accounts, newest first.
///
/// # Endpoint
///
/// `GET /api/v1/accounts`
pub async fn list_accounts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<Account>>, AppError> {
    let accounts = accounts::list_accounts(state.store.pool(), &auth.username).await?;
    Ok(Json(accounts))
}

/// Get one account by id.
///
/// # Endpoint
///
/// `GET /api/v1/accounts/{id}`
///
/// Returns 401 if the account exists but belongs to another user.
pub async fn get_account(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(account_id): Path<i64>,
) -> Result<Json<Account>, AppError> {
    let account = accounts::get_account(state.store.pool(), account_id).await?;

    if account.owner != auth.username {
        return Err(AppError::Unauthorized(
            "account does not belong to the authenticated user".to_string(),
        ));
    }

    Ok(Json(account))
}

/// Apply a signed delta to an account balance.
///
/// # Endpoint
///
/// `PUT /api/v1/accounts/{id}/balance`
///
/// Banker only: a depositor adjusting balances directly would mint
/// money. A delta that would overdraw the account returns 400.
pub async fn adjust_balance(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(account_id): Path<i64>,
    Json(request): Json<AdjustBalanceRequest>,
) -> Result<Json<Account>, AppError> {
    authorize(&auth, &[UserRole::Banker])?;

    let account =
        accounts::add_account_balance(state.store.pool(), account_id, request.amount).await?;

    Ok(Json(account))
}

/// Delete an account.
///
/// # Endpoint
///
/// `DELETE /api/v1/accounts/{id}`
///
/// Only the owner may delete; accounts with ledger history are
/// protected by foreign keys and return 409 Conflict.
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(account_id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let account = accounts::get_account(state.store.pool(), account_id).await?;

    if account.owner != auth.username {
        return Err(AppError::Unauthorized(
            "account does not belong to the authenticated user".to_string(),
        ));
    }

    accounts::delete_account(state.store.pool(), account_id).await?;

    Ok(Json(serde_json::json!({ "deleted": account_id })))
}
