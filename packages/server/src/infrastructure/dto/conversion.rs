//! Conversion logic between domain entities and wire DTOs.

use crate::domain::{Chat, ChatMessage, User};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain entity → DTO
// ========================================

impl From<&User> for dto::UserDto {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.as_str().to_string(),
            display_name: user.display_name.as_str().to_string(),
            tag: user.tag.value(),
        }
    }
}

impl From<&Chat> for dto::ChatDto {
    fn from(chat: &Chat) -> Self {
        Self {
            chat_id: chat.id.as_str().to_string(),
            name: chat.name.as_str().to_string(),
            created_at: chat.created_at.value(),
        }
    }
}

impl From<&ChatMessage> for dto::MessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            message_id: message.id.as_str().to_string(),
            chat_id: message.chat_id.as_str().to_string(),
            user_id: message.user_id.as_str().to_string(),
            content: message.content.as_str().to_string(),
            created_at: message.created_at.value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChatId, ChatName, DisplayName, Tag, Timestamp, UserId};

    #[test]
    fn test_user_entity_converts_to_dto() {
        // given:
        let user = User::new(
            UserId::new("u1".to_string()),
            DisplayName::new("alice".to_string()).unwrap(),
            Tag::new(3),
            Timestamp::new(1000),
        );

        // when:
        let dto = dto::UserDto::from(&user);

        // then:
        assert_eq!(dto.user_id, "u1");
        assert_eq!(dto.display_name, "alice");
        assert_eq!(dto.tag, 3);
    }

    #[test]
    fn test_chat_entity_converts_to_dto() {
        // given:
        let chat = Chat::new(
            ChatId::new("c1".to_string()),
            ChatName::new("general-chat".to_string()).unwrap(),
            Timestamp::new(2000),
        );

        // when:
        let dto = dto::ChatDto::from(&chat);

        // then:
        assert_eq!(dto.chat_id, "c1");
        assert_eq!(dto.name, "general-chat");
        assert_eq!(dto.created_at, 2000);
    }
}
