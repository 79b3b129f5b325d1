use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{create_module, delete_module, get_module, get_modules, update_module};

pub fn init_modules_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_modules).post(create_module))
        .route(
            "/{id}",
            get(get_module).put(update_module).delete(delete_module),
        )
}
