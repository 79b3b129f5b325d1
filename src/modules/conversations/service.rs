use chrono::Utc;
use futures::future::try_join_all;
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use learnhub_core::{AppError, Page, PaginationMeta};
use learnhub_db::Filters;
use learnhub_db::filters::push_page;

use crate::middleware::auth::AuthUser;
use crate::modules::conversations::model::{
    CONVERSATION_COLUMNS, Conversation, ConversationDetail, ConversationFilterParams,
    ConversationId, ConversationRef, ConversationStatus, ConversationType,
    ConversationWithLastMessage, CreateConversationDto, CreateMessageDto, MESSAGE_COLUMNS, Message,
    NewConversation, UpdateConversationDto,
};

pub const DEFAULT_CONVERSATION_LIMIT: i64 = 20;
pub const METADATA_REQUIRED: &str = "Metadata is required";

fn ensure_participant_or_admin(
    actor: &AuthUser,
    conversation: &Conversation,
) -> Result<(), AppError> {
    if actor.is_admin() || conversation.has_participant(actor.user_id) {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "Only participants or an admin can modify this conversation",
        ))
    }
}

/// Result of a create call: direct conversations that already exist are returned as is.
#[derive(Debug)]
pub struct CreatedConversation {
    pub conversation: Conversation,
    pub created: bool,
}

pub struct ConversationService;

impl ConversationService {
    /// Creates a conversation. A direct conversation between the same two
    /// users resolves to the existing row.
    #[instrument(skip(db, dto))]
    pub async fn create_conversation(
        db: &PgPool,
        dto: CreateConversationDto,
    ) -> Result<CreatedConversation, AppError> {
        let new = dto.into_new_conversation(Utc::now())?;

        if new.conversation_type == ConversationType::Direct
            && let Some(existing) = Self::find_direct(db, &new.conversation_key).await?
        {
            return Ok(CreatedConversation {
                conversation: existing,
                created: false,
            });
        }

        match Self::insert(db, &new).await {
            Ok(conversation) => Ok(CreatedConversation {
                conversation,
                created: true,
            }),
            // a concurrent request created the same direct conversation
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                let existing = Self::find_direct(db, &new.conversation_key)
                    .await?
                    .ok_or_else(|| AppError::internal_error("Direct conversation vanished"))?;
                Ok(CreatedConversation {
                    conversation: existing,
                    created: false,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn insert(db: &PgPool, new: &NewConversation) -> Result<Conversation, sqlx::Error> {
        sqlx::query_as::<_, Conversation>(&format!(
            "INSERT INTO conversations (conversation_key, conversation_type, participants, metadata)
             VALUES ($1, $2, $3, $4)
             RETURNING {CONVERSATION_COLUMNS}"
        ))
        .bind(&new.conversation_key)
        .bind(new.conversation_type)
        .bind(&new.participants)
        .bind(&new.metadata)
        .fetch_one(db)
        .await
    }

    async fn find_direct(db: &PgPool, key: &str) -> Result<Option<Conversation>, AppError> {
        let conversation = sqlx::query_as::<_, Conversation>(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations
             WHERE conversation_key = $1 AND conversation_type = $2"
        ))
        .bind(key)
        .bind(ConversationType::Direct)
        .fetch_optional(db)
        .await?;

        Ok(conversation)
    }

    /// Newest activity first, each row with its latest message.
    #[instrument(skip(db))]
    pub async fn list_conversations(
        db: &PgPool,
        filters: ConversationFilterParams,
    ) -> Result<Page<ConversationWithLastMessage>, AppError> {
        let limit = filters.pagination.limit_or(DEFAULT_CONVERSATION_LIMIT);
        let page = filters.pagination.page();

        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM conversations");
        apply_filters(&mut count_query, &filters);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(db)
            .await?;

        let mut data_query =
            QueryBuilder::new(format!("SELECT {CONVERSATION_COLUMNS} FROM conversations"));
        apply_filters(&mut data_query, &filters);
        data_query.push(" ORDER BY updated_at DESC");
        push_page(&mut data_query, limit, filters.pagination.offset(limit));
        let conversations = data_query
            .build_query_as::<Conversation>()
            .fetch_all(db)
            .await?;

        let rows = try_join_all(conversations.into_iter().map(|conversation| async move {
            let last_message = Self::last_message(db, conversation.id).await?;
            Ok::<_, AppError>(ConversationWithLastMessage {
                conversation,
                last_message,
            })
        }))
        .await?;

        Ok(Page {
            data: rows,
            meta: PaginationMeta::new(total, limit, page),
        })
    }

    async fn last_message(
        db: &PgPool,
        conversation_id: ConversationId,
    ) -> Result<Option<Message>, AppError> {
        let message = sqlx::query_as::<_, Message>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages
             WHERE conversation_id = $1
             ORDER BY created_at DESC
             LIMIT 1"
        ))
        .bind(conversation_id)
        .fetch_optional(db)
        .await?;

        Ok(message)
    }

    #[instrument(skip(db))]
    pub async fn find_by_id(db: &PgPool, id: ConversationId) -> Result<Conversation, AppError> {
        sqlx::query_as::<_, Conversation>(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("Conversation not found"))
    }

    /// Looks a conversation up by id or key and loads its messages, newest first.
    #[instrument(skip(db))]
    pub async fn get_conversation(
        db: &PgPool,
        conversation_ref: ConversationRef,
    ) -> Result<ConversationDetail, AppError> {
        let conversation = match conversation_ref {
            ConversationRef::Id(id) => Self::find_by_id(db, id).await?,
            ConversationRef::Key(key) => sqlx::query_as::<_, Conversation>(&format!(
                "SELECT {CONVERSATION_COLUMNS} FROM conversations
                 WHERE conversation_key = $1
                 ORDER BY created_at ASC
                 LIMIT 1"
            ))
            .bind(key)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found("Conversation not found"))?,
        };

        let messages = sqlx::query_as::<_, Message>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages
             WHERE conversation_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(conversation.id)
        .fetch_all(db)
        .await?;

        Ok(ConversationDetail {
            conversation,
            messages,
        })
    }

    #[instrument(skip(db, dto))]
    pub async fn update_conversation(
        db: &PgPool,
        actor: &AuthUser,
        id: ConversationId,
        dto: UpdateConversationDto,
    ) -> Result<Conversation, AppError> {
        let metadata: Value = dto
            .metadata
            .ok_or_else(|| AppError::bad_request(METADATA_REQUIRED))?;

        let existing = Self::find_by_id(db, id).await?;
        ensure_participant_or_admin(actor, &existing)?;

        let conversation = sqlx::query_as::<_, Conversation>(&format!(
            "UPDATE conversations SET metadata = $1, updated_at = NOW()
             WHERE id = $2
             RETURNING {CONVERSATION_COLUMNS}"
        ))
        .bind(&metadata)
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(conversation)
    }

    /// Soft delete: the conversation is blocked.
    #[instrument(skip(db))]
    pub async fn delete_conversation(
        db: &PgPool,
        actor: &AuthUser,
        id: ConversationId,
    ) -> Result<Conversation, AppError> {
        let existing = Self::find_by_id(db, id).await?;
        ensure_participant_or_admin(actor, &existing)?;

        let conversation = sqlx::query_as::<_, Conversation>(&format!(
            "UPDATE conversations SET status = $1, updated_at = NOW()
             WHERE id = $2
             RETURNING {CONVERSATION_COLUMNS}"
        ))
        .bind(ConversationStatus::Blocked)
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(conversation)
    }

    /// Appends a message from a participant and bumps the conversation's
    /// `updated_at` so it sorts first in listings.
    #[instrument(skip(db, dto))]
    pub async fn send_message(
        db: &PgPool,
        actor: &AuthUser,
        id: ConversationId,
        dto: CreateMessageDto,
    ) -> Result<Message, AppError> {
        let conversation = Self::find_by_id(db, id).await?;
        if !conversation.has_participant(actor.user_id) {
            return Err(AppError::forbidden(
                "You are not a participant in this conversation",
            ));
        }
        if conversation.status == ConversationStatus::Blocked {
            return Err(AppError::bad_request("Conversation is blocked"));
        }

        let message = sqlx::query_as::<_, Message>(&format!(
            "INSERT INTO messages (conversation_id, sender_id, content)
             VALUES ($1, $2, $3)
             RETURNING {MESSAGE_COLUMNS}"
        ))
        .bind(id)
        .bind(actor.user_id)
        .bind(&dto.content)
        .fetch_one(db)
        .await?;

        sqlx::query("UPDATE conversations SET updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(message)
    }
}

fn apply_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &ConversationFilterParams) {
    Filters::new(qb)
        .array_contains("participants", filters.user_id)
        .eq("conversation_type", filters.conversation_type)
        .eq("status", filters.status);
}

#[cfg(test)]
mod tests {
    use learnhub_models::{UserId, UserRole};

    use super::*;

    fn conversation(participants: Vec<UserId>) -> Conversation {
        Conversation {
            id: ConversationId::new(),
            conversation_key: "group-1700000000123".into(),
            conversation_type: ConversationType::Group,
            participants,
            metadata: serde_json::json!({}),
            status: ConversationStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn actor(role: UserRole) -> AuthUser {
        AuthUser {
            user_id: UserId::new(),
            role,
        }
    }

    #[test]
    fn test_participant_may_modify() {
        let student = actor(UserRole::Student);
        let conv = conversation(vec![student.user_id, UserId::new()]);
        assert!(ensure_participant_or_admin(&student, &conv).is_ok());
    }

    #[test]
    fn test_outsider_is_forbidden_unless_admin() {
        let conv = conversation(vec![UserId::new(), UserId::new()]);
        assert!(ensure_participant_or_admin(&actor(UserRole::Instructor), &conv).is_err());
        assert!(ensure_participant_or_admin(&actor(UserRole::Admin), &conv).is_ok());
    }
}
