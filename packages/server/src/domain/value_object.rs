//! Value objects: validated newtypes used across the domain.
//!
//! Validation happens once, at the boundary where raw strings enter
//! the system. Everything past that point carries the typed value.

use thiserror::Error;
use uuid::Uuid;

/// Validation failure for a value object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("{0} required")]
    Empty(&'static str),
    #[error("{0} too long (max {1} characters)")]
    TooLong(&'static str, usize),
}

const DISPLAY_NAME_MAX: usize = 64;
const CHAT_NAME_MAX: usize = 64;
const MESSAGE_CONTENT_MAX: usize = 2000;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing id value.
            pub fn new(value: String) -> Self {
                Self(value)
            }

            /// Generate a fresh random id.
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

uuid_id! {
    /// Identifier of a registered user.
    UserId
}
uuid_id! {
    /// Identifier of a chat (room).
    ChatId
}
uuid_id! {
    /// Identifier of a persisted message.
    MessageId
}
uuid_id! {
    /// Identifier of one live transport connection. Ephemeral, never
    /// persisted; a user may hold several at once.
    ConnectionId
}

/// Display name chosen at registration. Non-empty, bounded length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(value: String) -> Result<Self, ValueError> {
        if value.trim().is_empty() {
            return Err(ValueError::Empty("displayName"));
        }
        if value.chars().count() > DISPLAY_NAME_MAX {
            return Err(ValueError::TooLong("displayName", DISPLAY_NAME_MAX));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Chat name. Non-empty, bounded length, unique across chats (the
/// uniqueness check lives in the create-chat operation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatName(String);

impl ChatName {
    pub fn new(value: String) -> Result<Self, ValueError> {
        if value.trim().is_empty() {
            return Err(ValueError::Empty("chatName"));
        }
        if value.chars().count() > CHAT_NAME_MAX {
            return Err(ValueError::TooLong("chatName", CHAT_NAME_MAX));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Message body. Non-empty, bounded length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(value: String) -> Result<Self, ValueError> {
        if value.trim().is_empty() {
            return Err(ValueError::Empty("content"));
        }
        if value.chars().count() > MESSAGE_CONTENT_MAX {
            return Err(ValueError::TooLong("content", MESSAGE_CONTENT_MAX));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Small positive integer disambiguating duplicate display names.
/// Assigned monotonically per registration, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(u32);

impl Tag {
    pub const FIRST: Tag = Tag(1);

    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// The tag assigned to the registration after this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

/// Unix timestamp in UTC milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}
