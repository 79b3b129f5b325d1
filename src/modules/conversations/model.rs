pub use learnhub_models::conversations::{
    CONVERSATION_COLUMNS, Conversation, ConversationDetail, ConversationFilterParams,
    ConversationRef, ConversationWithLastMessage, CreateConversationDto, CreateMessageDto,
    MESSAGE_COLUMNS, Message, NewConversation, UpdateConversationDto,
};
pub use learnhub_models::{ConversationId, ConversationStatus, ConversationType};
