//! Chat transcript types.

use serde::{Deserialize, Serialize};

/// Who produced a turn. Exactly two values; the system instruction is not a
/// transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One entry in the transcript. Turns are append-only; never edited or
/// removed for the lifetime of the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub body: String,
}

impl ChatTurn {
    /// Create a user turn.
    pub fn user(body: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            body: body.into(),
        }
    }

    /// Create an assistant turn.
    pub fn assistant(body: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }

    #[test]
    fn test_turn_constructors() {
        let turn = ChatTurn::user("show active policies");
        assert_eq!(turn.role, Role::User);
        assert_eq!(turn.body, "show active policies");
    }

    #[test]
    fn test_turn_serializes_role_lowercase() {
        let json = serde_json::to_string(&ChatTurn::assistant("hi")).unwrap();
        assert!(json.contains("\"assistant\""));
    }
}
