//! UseCase: login by user id.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::{ChatStore, StoreError, User, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginUserError {
    #[error("user not found")]
    NotFound,
    #[error("store failure: {0}")]
    StoreFailure(#[from] StoreError),
}

/// Login usecase: resolves an opaque user id to the stored user.
pub struct LoginUserUseCase {
    store: Arc<dyn ChatStore>,
}

impl LoginUserUseCase {
    pub fn new(store: Arc<dyn ChatStore>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, user_id: UserId) -> Result<User, LoginUserError> {
        self.store
            .find_user(&user_id)
            .await?
            .ok_or(LoginUserError::NotFound)
    }
}
