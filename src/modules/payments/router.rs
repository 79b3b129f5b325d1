use axum::{Router, middleware, routing::get};

use crate::middleware::role::require_admin;
use crate::state::AppState;

use super::controller::{
    create_payment, delete_payment, get_payment, get_payments, update_payment,
};

/// Every payment route is admin-only.
pub fn init_payments_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(get_payments).post(create_payment))
        .route(
            "/{id}",
            get(get_payment).put(update_payment).delete(delete_payment),
        )
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}
