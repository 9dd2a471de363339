use crate::errors::AppError;
use crate::feed::{self, TIMELINE_LIMIT};
use crate::models::{
    AppData, LikeResponse, MessageView, NewMessageRequest, NewUserRequest, StatsResponse, User,
    UserSearch,
};
use crate::state::AppState;
use crate::stats::build_stats;
use crate::storage::persist_data;
use crate::ui::{render_index, IndexView};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Html,
    Json,
};
use chrono::Utc;
use tracing::info;

pub const USER_HEADER: &str = "x-user";

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let data = state.data.lock().await;
    let view = IndexView {
        stats: build_stats(&data),
        messages: feed::recent_messages(&data, TIMELINE_LIMIT),
        stat_mode: state.config.stat_mode,
    };
    Html(render_index(&view))
}

pub async fn autocomplete(State(state): State<AppState>) -> Json<Vec<String>> {
    let data = state.data.lock().await;
    Json(feed::usernames(&data))
}

pub async fn like_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(message_id): Path<u64>,
) -> Result<Json<LikeResponse>, AppError> {
    let mut data = state.data.lock().await;
    let user_id = acting_user(&state, &headers, &data)?;
    let response = feed::toggle_like(&mut data, message_id, user_id)?;
    persist_data(&state.config.data_path, &data).await?;

    info!(message_id, user_id, liked = response.liked, "like toggled");
    Ok(Json(response))
}

pub async fn list_messages(State(state): State<AppState>) -> Json<Vec<MessageView>> {
    let data = state.data.lock().await;
    Json(feed::recent_messages(&data, TIMELINE_LIMIT))
}

pub async fn create_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<NewMessageRequest>,
) -> Result<(StatusCode, Json<MessageView>), AppError> {
    let mut data = state.data.lock().await;
    let user_id = acting_user(&state, &headers, &data)?;
    let created_at = Utc::now().to_rfc3339();
    let message = feed::create_message(&mut data, user_id, &payload.text, created_at)?;
    persist_data(&state.config.data_path, &data).await?;

    info!(message_id = message.id, user_id, "message posted");
    Ok((StatusCode::CREATED, Json(feed::to_view(&data, &message))))
}

pub async fn show_message(
    State(state): State<AppState>,
    Path(message_id): Path<u64>,
) -> Result<Json<MessageView>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(feed::message(&data, message_id)?))
}

pub async fn delete_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(message_id): Path<u64>,
) -> Result<StatusCode, AppError> {
    let mut data = state.data.lock().await;
    let user_id = acting_user(&state, &headers, &data)?;
    feed::delete_message(&mut data, message_id, user_id)?;
    persist_data(&state.config.data_path, &data).await?;

    info!(message_id, user_id, "message deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(search): Query<UserSearch>,
) -> Json<Vec<User>> {
    let data = state.data.lock().await;
    Json(feed::search_users(&data, search.q.as_deref()))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<NewUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let mut data = state.data.lock().await;
    let user = feed::create_user(&mut data, &payload.username)?;
    persist_data(&state.config.data_path, &data).await?;

    info!(user_id = user.id, username = %user.username, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn user_likes(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
) -> Result<Json<Vec<MessageView>>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(feed::liked_messages(&data, user_id)?))
}

pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let data = state.data.lock().await;
    Json(build_stats(&data))
}

/// Resolves the `x-user` header, or the configured default, to a user id.
fn acting_user(state: &AppState, headers: &HeaderMap, data: &AppData) -> Result<u64, AppError> {
    let username = match headers.get(USER_HEADER) {
        Some(value) => value
            .to_str()
            .map_err(|_| AppError::bad_request("x-user header must be valid text"))?
            .trim(),
        None => state.config.default_user.as_str(),
    };

    feed::find_user_by_name(data, username)
        .map(|user| user.id)
        .ok_or_else(|| AppError::unauthorized("Access unauthorized."))
}
