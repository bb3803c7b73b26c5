//! Transfer HTTP handler.
//!
//! `POST /api/v1/transfers` - move funds between two accounts.

use std::time::Duration;

use axum::{Extension, Json, extract::State};

use crate::{
    AppState,
    error::AppError,
    middleware::auth::AuthContext,
    models::{
        account::Currency,
        transfer::{CreateTransferRequest, TransferResponse},
    },
    store::{
        accounts,
        retry::{RetryPolicy, call_with_retry},
        transfer_tx::TransferTxParams,
    },
};

/// Create a transfer.
///
/// # Endpoint
///
/// `POST /api/v1/transfers`
///
/// # Checks
///
/// - the source account belongs to the authenticated user
/// - both accounts use the requested currency
///
/// The transfer itself runs under the caller-side retry policy: a
/// transient failure (deadlock report, dropped connection, attempt
/// timeout) retries the whole operation from scratch, which is safe
/// because a failed attempt leaves no partial effects.
pub async fn create_transfer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CreateTransferRequest>,
) -> Result<Json<TransferResponse>, AppError> {
    let from_account =
        accounts::get_account(state.store.pool(), request.from_account_id).await?;
    if from_account.owner != auth.username {
        return Err(AppError::Unauthorized(
            "source account does not belong to the authenticated user".to_string(),
        ));
    }
    check_currency(from_account.id, from_account.currency, request.currency)?;

    let to_account = accounts::get_account(state.store.pool(), request.to_account_id).await?;
    check_currency(to_account.id, to_account.currency, request.currency)?;

    let policy = RetryPolicy {
        max_attempts: state.config.transfer_max_attempts,
        attempt_timeout: state.config.transfer_attempt_timeout(),
        base_backoff: Duration::from_millis(100),
    };
    let params = TransferTxParams {
        from_account_id: request.from_account_id,
        to_account_id: request.to_account_id,
        amount: request.amount,
    };

    let result = call_with_retry(&policy, || state.store.transfer_tx(params)).await?;

    Ok(Json(TransferResponse {
        transfer: result.transfer,
        from_account: result.from_account,
        to_account: result.to_account,
        from_entry: result.from_entry,
        to_entry: result.to_entry,
    }))
}

fn check_currency(account_id: i64, actual: Currency, requested: Currency) -> Result<(), AppError> {
    if actual != requested {
        return Err(AppError::Invalid(format!(
            "account {account_id} currency mismatch: {actual} vs {requested}"
        )));
    }
    Ok(())
}
