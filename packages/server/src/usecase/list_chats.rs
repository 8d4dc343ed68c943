//! UseCase: list all chats.

use std::sync::Arc;

use crate::domain::{Chat, ChatStore, StoreError};

/// Lists chats in creation order (stable, documented contract).
pub struct ListChatsUseCase {
    store: Arc<dyn ChatStore>,
}

impl ListChatsUseCase {
    pub fn new(store: Arc<dyn ChatStore>) -> Self {
        Self { store }
    }

    pub async fn execute(&self) -> Result<Vec<Chat>, StoreError> {
        self.store.list_chats().await
    }
}
