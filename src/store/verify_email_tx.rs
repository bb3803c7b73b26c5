//! Email-verification operation - consume a one-time verification code.

use chrono::Utc;

use crate::{
    error::AppError,
    models::{user::User, verify_email::VerifyEmail},
    store::{Store, users, verify_emails},
};

/// Input parameters for [`Store::verify_email_tx`].
#[derive(Debug, Clone)]
pub struct VerifyEmailTxParams {
    pub username: String,
    pub secret_code: String,
}

/// Result of a successful verification: the consumed record and the
/// user with `is_email_verified` now true.
#[derive(Debug)]
pub struct VerifyEmailTxResult {
    pub user: User,
    pub verify_email: VerifyEmail,
}

impl Store {
    /// Validate and consume a verification code in one transaction.
    ///
    /// # Process
    ///
    /// 1. Fetch the record matching (username, secret_code), taking its
    ///    row lock so concurrent attempts serialize
    /// 2. Validate: a record matched, not already used, not expired.
    ///    Any failing check aborts with `Invalid` and nothing mutates.
    ///    A missing row covers unknown usernames and mismatched codes
    ///    alike; the response does not disclose which part was wrong.
    /// 3. Mark the record used
    /// 4. Flip the user's `is_email_verified` flag
    ///
    /// A second call with the same code fails at step 2 and never
    /// un-sets the flag. Expiry is enforced only here; an expired
    /// record is never mutated.
    pub async fn verify_email_tx(
        &self,
        params: VerifyEmailTxParams,
    ) -> Result<VerifyEmailTxResult, AppError> {
        self.with_transaction(move |tx| {
            Box::pin(async move {
                let record = verify_emails::get_verify_email_for_update(
                    &mut **tx,
                    &params.username,
                    &params.secret_code,
                )
                .await?
                .ok_or_else(|| {
                    AppError::Invalid("verification code is invalid".to_string())
                })?;

                if record.is_used {
                    return Err(AppError::Invalid(
                        "verification code has already been used".to_string(),
                    ));
                }
                if record.expired_at < Utc::now() {
                    return Err(AppError::Invalid(
                        "verification code has expired".to_string(),
                    ));
                }

                let verify_email =
                    verify_emails::mark_verify_email_used(&mut **tx, record.id).await?;
                let user =
                    users::set_user_email_verified(&mut **tx, &verify_email.username).await?;

                Ok(VerifyEmailTxResult { user, verify_email })
            })
        })
        .await
    }
}
