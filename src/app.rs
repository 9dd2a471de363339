use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{header, HeaderValue},
    middleware,
    response::Response,
    routing::{get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/autocomplete", get(handlers::autocomplete))
        .route("/messages/:id/add", post(handlers::like_message))
        .route("/messages/:id/like/add", post(handlers::like_message))
        .route("/api/messages", get(handlers::list_messages).post(handlers::create_message))
        .route(
            "/api/messages/:id",
            get(handlers::show_message).delete(handlers::delete_message),
        )
        .route("/api/users", get(handlers::list_users).post(handlers::create_user))
        .route("/api/users/:id/likes", get(handlers::user_likes))
        .route("/api/stats", get(handlers::get_stats))
        .layer(middleware::map_response(no_cache))
        .with_state(state)
}

async fn no_cache(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("public, max-age=0"));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    response
}
