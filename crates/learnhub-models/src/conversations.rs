//! Conversations and their messages.
//!
//! A direct conversation is identified by a key derived from its sorted
//! participant ids, so creating the same pair twice resolves to one row. Group
//! conversations get a time-based key instead.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use learnhub_core::errors::AppError;
use learnhub_core::pagination::PaginationParams;
use learnhub_core::serde::deserialize_optional_parse;

use crate::enums::{ConversationStatus, ConversationType};
use crate::ids::{ConversationId, MessageId, UserId};

pub const CONVERSATION_COLUMNS: &str = "id, conversation_key, conversation_type, participants, \
     metadata, status, created_at, updated_at";

/// Upper bound on distinct participants, keeping direct keys within index limits.
pub const MAX_PARTICIPANTS: usize = 50;

pub const MESSAGE_COLUMNS: &str = "id, conversation_id, sender_id, content, created_at";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Conversation {
    pub id: ConversationId,
    pub conversation_key: String,
    #[serde(rename = "type")]
    pub conversation_type: ConversationType,
    pub participants: Vec<UserId>,
    /// Free-form JSON object
    #[schema(value_type = Object)]
    pub metadata: Value,
    pub status: ConversationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn has_participant(&self, user_id: UserId) -> bool {
        self.participants.contains(&user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// List row: the conversation plus its most recent message, if any.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConversationWithLastMessage {
    #[serde(flatten)]
    pub conversation: Conversation,
    pub last_message: Option<Message>,
}

/// A conversation with its messages, newest first.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConversationDetail {
    pub conversation: Conversation,
    pub messages: Vec<Message>,
}

/// `type` is taken as text so an unknown value reports "Invalid conversation type"
/// rather than a JSON error. The remaining checks live in
/// [`CreateConversationDto::into_new_conversation`].
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateConversationDto {
    #[serde(default)]
    pub participants: Vec<UserId>,
    #[serde(rename = "type", default)]
    #[schema(example = "direct")]
    pub conversation_type: String,
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<Value>,
}

/// A checked conversation ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewConversation {
    pub conversation_key: String,
    pub conversation_type: ConversationType,
    pub participants: Vec<UserId>,
    pub metadata: Value,
}

impl CreateConversationDto {
    /// Deduplicates participants, checks the type and derives the key.
    pub fn into_new_conversation(self, now: DateTime<Utc>) -> Result<NewConversation, AppError> {
        let participants: Vec<UserId> = self
            .participants
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        if participants.len() < 2 {
            return Err(AppError::bad_request(
                "Participants must be an array of at least 2 user IDs",
            ));
        }
        if participants.len() > MAX_PARTICIPANTS {
            return Err(AppError::bad_request(format!(
                "A conversation can have at most {MAX_PARTICIPANTS} participants"
            )));
        }

        let conversation_type: ConversationType = self
            .conversation_type
            .parse()
            .map_err(|_| AppError::bad_request("Invalid conversation type"))?;

        let conversation_key = match conversation_type {
            ConversationType::Direct => direct_conversation_key(&participants),
            ConversationType::Group => group_conversation_key(now),
        };

        Ok(NewConversation {
            conversation_key,
            conversation_type,
            participants,
            metadata: self.metadata.unwrap_or_else(|| Value::Object(Default::default())),
        })
    }
}

/// Sorted participant ids joined with `-`. Order of input does not matter.
pub fn direct_conversation_key(participants: &[UserId]) -> String {
    let mut ids: Vec<String> = participants.iter().map(|id| id.to_string()).collect();
    ids.sort();
    ids.dedup();
    ids.join("-")
}

pub fn group_conversation_key(now: DateTime<Utc>) -> String {
    format!("group-{}", now.timestamp_millis())
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateConversationDto {
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateMessageDto {
    #[validate(length(min = 1, max = 5000, message = "Content must be between 1 and 5000 characters"))]
    pub content: String,
}

/// `GET /conversation` filters.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConversationFilterParams {
    /// Conversations this user takes part in
    #[serde(rename = "userId", default, deserialize_with = "deserialize_optional_parse")]
    pub user_id: Option<UserId>,
    #[serde(rename = "type")]
    pub conversation_type: Option<ConversationType>,
    pub status: Option<ConversationStatus>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// How `GET /conversation/{ref}` addresses a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationRef {
    Id(ConversationId),
    Key(String),
}

impl ConversationRef {
    pub fn parse(value: &str) -> Self {
        match Uuid::parse_str(value) {
            Ok(id) => ConversationRef::Id(id.into()),
            Err(_) => ConversationRef::Key(value.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(participants: Vec<UserId>, kind: &str) -> CreateConversationDto {
        CreateConversationDto {
            participants,
            conversation_type: kind.to_string(),
            metadata: None,
        }
    }

    #[test]
    fn test_direct_key_is_order_independent() {
        let a = UserId::new();
        let b = UserId::new();
        assert_eq!(
            direct_conversation_key(&[a, b]),
            direct_conversation_key(&[b, a])
        );
        assert!(direct_conversation_key(&[a, b]).contains(&a.to_string()));
    }

    #[test]
    fn test_group_key_uses_millis() {
        let now = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        assert_eq!(group_conversation_key(now), "group-1700000000123");
    }

    #[test]
    fn test_requires_two_distinct_participants() {
        let a = UserId::new();
        let err = dto(vec![a, a], "direct")
            .into_new_conversation(Utc::now())
            .unwrap_err();
        assert_eq!(
            err.public_message(),
            "Participants must be an array of at least 2 user IDs"
        );
        assert!(dto(vec![], "group").into_new_conversation(Utc::now()).is_err());
    }

    #[test]
    fn test_participant_limit() {
        let at_limit: Vec<UserId> = (0..MAX_PARTICIPANTS).map(|_| UserId::new()).collect();
        let new = dto(at_limit.clone(), "direct")
            .into_new_conversation(Utc::now())
            .unwrap();
        assert_eq!(new.participants.len(), MAX_PARTICIPANTS);

        let mut over = at_limit;
        over.push(UserId::new());
        let err = dto(over, "group")
            .into_new_conversation(Utc::now())
            .unwrap_err();
        assert_eq!(
            err.public_message(),
            "A conversation can have at most 50 participants"
        );
    }

    #[test]
    fn test_rejects_unknown_type() {
        let err = dto(vec![UserId::new(), UserId::new()], "broadcast")
            .into_new_conversation(Utc::now())
            .unwrap_err();
        assert_eq!(err.public_message(), "Invalid conversation type");
    }

    #[test]
    fn test_new_direct_conversation() {
        let a = UserId::new();
        let b = UserId::new();
        let new = dto(vec![b, a, b], "direct")
            .into_new_conversation(Utc::now())
            .unwrap();
        assert_eq!(new.conversation_type, ConversationType::Direct);
        assert_eq!(new.participants.len(), 2);
        assert_eq!(new.conversation_key, direct_conversation_key(&[a, b]));
        assert_eq!(new.metadata, serde_json::json!({}));
    }

    #[test]
    fn test_conversation_ref_parse() {
        let id = ConversationId::new();
        assert_eq!(ConversationRef::parse(&id.to_string()), ConversationRef::Id(id));
        assert_eq!(
            ConversationRef::parse("group-1700000000123"),
            ConversationRef::Key("group-1700000000123".into())
        );
    }
}
