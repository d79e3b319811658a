//! Router assembly.
//!
//! Three route groups share one [`AppState`]:
//! - `/health` (public)
//! - `/admin/v1/*` behind the `X-Admin-Key` gate
//! - `/api/v1/*` behind the `X-API-Key` gate

use std::time::Duration;

use axum::{
    Router,
    http::StatusCode,
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{handlers, middleware, response::ApiResponse, state::AppState};

/// Build the application router.
///
/// `request_timeout` bounds every request; when it fires the handler future is dropped,
/// which cancels any in-flight query and returns its connection to the pool.
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let admin_routes = Router::new()
        .route(
            "/admin/v1/api-keys",
            get(handlers::api_keys::list_api_keys).post(handlers::api_keys::create_api_key),
        )
        .route(
            "/admin/v1/api-keys/{id}",
            get(handlers::api_keys::get_api_key)
                .patch(handlers::api_keys::update_api_key)
                .delete(handlers::api_keys::delete_api_key),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::admin::admin_middleware,
        ));

    let client_routes = Router::new()
        .route("/api/v1/ping", get(handlers::health::ping))
        .route(
            "/api/v1/categories",
            get(handlers::categories::list_categories)
                .post(handlers::categories::create_category),
        )
        .route(
            "/api/v1/categories/{id}",
            get(handlers::categories::get_category)
                .patch(handlers::categories::update_category)
                .delete(handlers::categories::delete_category),
        )
        .route(
            "/api/v1/transactions",
            get(handlers::transactions::list_transactions)
                .post(handlers::transactions::create_transaction),
        )
        .route(
            "/api/v1/transactions/{id}",
            get(handlers::transactions::get_transaction)
                .patch(handlers::transactions::update_transaction)
                .delete(handlers::transactions::delete_transaction),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::api_key_middleware,
        ));

    let app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(admin_routes)
        .merge(client_routes);

    with_request_timeout(app, request_timeout)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bound every request by `timeout`, answering an expired one with the 408 envelope.
fn with_request_timeout<S>(router: Router<S>, timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(axum_middleware::map_response(timeout_envelope))
}

/// The timeout layer answers with an empty body; give it the usual envelope.
async fn timeout_envelope(response: Response) -> Response {
    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }

    tracing::warn!("request timed out");
    ApiResponse::message(StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response()
}
