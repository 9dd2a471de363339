use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub user_id: u64,
    pub text: String,
    pub created_at: String,
}

/// Everything the server persists, written as one JSON document.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub next_user_id: u64,
    #[serde(default)]
    pub next_message_id: u64,
    #[serde(default)]
    pub users: BTreeMap<u64, User>,
    #[serde(default)]
    pub messages: BTreeMap<u64, Message>,
    /// `(message_id, user_id)` pairs.
    #[serde(default)]
    pub likes: BTreeSet<(u64, u64)>,
}

#[derive(Debug, Deserialize)]
pub struct NewMessageRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct NewUserRequest {
    pub username: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserSearch {
    pub q: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeResponse {
    pub message_id: u64,
    pub liked: bool,
    pub likes: u64,
    /// Likes across all messages, for the stat panel.
    pub total_likes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageView {
    pub id: u64,
    pub user_id: u64,
    pub username: String,
    pub text: String,
    pub created_at: String,
    pub likes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub users: u64,
    pub messages: u64,
    pub likes: u64,
}
