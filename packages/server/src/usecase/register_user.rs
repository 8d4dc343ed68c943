//! UseCase: user registration.
//!
//! Assigns the next tag (previous max + 1, starting at 1) atomically
//! with user creation: the read-latest-then-increment sequence is
//! closed under a dedicated registration lock so concurrent
//! registrations can never observe the same latest user.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use agora_shared::time::get_utc_timestamp;

use crate::domain::{
    ChatStore, DisplayName, StoreError, Tag, Timestamp, User, UserId, ValueError,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterUserError {
    #[error("{0}")]
    Validation(#[from] ValueError),
    #[error("store failure: {0}")]
    StoreFailure(#[from] StoreError),
}

/// Registration usecase.
pub struct RegisterUserUseCase {
    store: Arc<dyn ChatStore>,
    /// Serializes tag assignment with user creation.
    registration_lock: Mutex<()>,
}

impl RegisterUserUseCase {
    pub fn new(store: Arc<dyn ChatStore>) -> Self {
        Self {
            store,
            registration_lock: Mutex::new(()),
        }
    }

    /// Register a user under the given display name.
    ///
    /// Duplicate display names are allowed; the tag disambiguates.
    pub async fn execute(&self, display_name: String) -> Result<User, RegisterUserError> {
        let display_name = DisplayName::new(display_name)?;

        let _guard = self.registration_lock.lock().await;

        let tag = self
            .store
            .latest_user_by_creation()
            .await?
            .map(|latest| latest.tag.next())
            .unwrap_or(Tag::FIRST);

        let user = User::new(
            UserId::generate(),
            display_name,
            tag,
            Timestamp::new(get_utc_timestamp()),
        );
        self.store.save_user(user.clone()).await?;

        tracing::info!(
            "Registered user '{}' (tag {})",
            user.display_name.as_str(),
            user.tag.value()
        );
        Ok(user)
    }
}
