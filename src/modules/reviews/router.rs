use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{create_review, delete_review, get_review, get_reviews, update_review};

pub fn init_reviews_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_reviews).post(create_review))
        .route(
            "/{id}",
            get(get_review).put(update_review).delete(delete_review),
        )
}
