//! User-creation operation - insert a user together with a side effect.

use futures::future::BoxFuture;

use crate::{
    error::AppError,
    models::user::User,
    store::{Store, users, users::CreateUserParams},
};

/// Caller-supplied capability executed inside the same transaction as
/// the user insert. In the reference deployment this enqueues the
/// verification-email task.
pub type AfterCreateFn =
    Box<dyn FnOnce(User) -> BoxFuture<'static, Result<(), AppError>> + Send>;

/// Input parameters for [`Store::create_user_tx`].
pub struct CreateUserTxParams {
    pub create_user: CreateUserParams,
    pub after_create: AfterCreateFn,
}

impl Store {
    /// Insert a user and run the side-effect callback in one transaction.
    ///
    /// # Process
    ///
    /// 1. Insert the user row
    /// 2. Invoke `after_create` with the created user
    ///
    /// If the callback fails, the whole unit of work fails and the
    /// insert is rolled back: the user row is persisted only if the
    /// side effect was accepted. The callback's error is surfaced as
    /// [`AppError::SideEffectFailed`] chaining the cause.
    ///
    /// # Errors
    ///
    /// - `Conflict`: username or email already taken
    /// - `SideEffectFailed`: the callback rejected the user
    pub async fn create_user_tx(&self, params: CreateUserTxParams) -> Result<User, AppError> {
        let CreateUserTxParams {
            create_user,
            after_create,
        } = params;

        self.with_transaction(move |tx| {
            Box::pin(async move {
                let user = users::create_user(&mut **tx, &create_user).await?;

                after_create(user.clone())
                    .await
                    .map_err(|cause| AppError::SideEffectFailed(Box::new(cause)))?;

                Ok(user)
            })
        })
        .await
    }
}
