use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_conversation, delete_conversation, get_conversation, get_conversations, send_message,
    update_conversation,
};

pub fn init_conversations_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_conversations).post(create_conversation))
        .route(
            "/{id}",
            get(get_conversation)
                .put(update_conversation)
                .delete(delete_conversation),
        )
        .route("/{id}/messages", post(send_message))
}
