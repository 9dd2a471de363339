use crate::errors::AppError;
use crate::models::{AppData, LikeResponse, Message, MessageView, User};

pub const MAX_MESSAGE_CHARS: usize = 140;
pub const TIMELINE_LIMIT: usize = 100;

pub fn find_user_by_name<'a>(data: &'a AppData, username: &str) -> Option<&'a User> {
    data.users.values().find(|user| user.username == username)
}

pub fn create_user(data: &mut AppData, username: &str) -> Result<User, AppError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::bad_request("username must not be empty"));
    }
    if find_user_by_name(data, username).is_some() {
        return Err(AppError::conflict("Username already taken"));
    }

    data.next_user_id += 1;
    let user = User {
        id: data.next_user_id,
        username: username.to_string(),
    };
    data.users.insert(user.id, user.clone());
    Ok(user)
}

/// Returns the user and whether it had to be created.
pub fn ensure_user(data: &mut AppData, username: &str) -> Result<(User, bool), AppError> {
    if let Some(user) = find_user_by_name(data, username.trim()) {
        return Ok((user.clone(), false));
    }
    create_user(data, username).map(|user| (user, true))
}

pub fn create_message(
    data: &mut AppData,
    user_id: u64,
    text: &str,
    created_at: String,
) -> Result<Message, AppError> {
    if !data.users.contains_key(&user_id) {
        return Err(AppError::not_found(format!("user {user_id} not found")));
    }
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::bad_request("message text must not be empty"));
    }
    if text.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AppError::bad_request(format!(
            "message text must be at most {MAX_MESSAGE_CHARS} characters"
        )));
    }

    data.next_message_id += 1;
    let message = Message {
        id: data.next_message_id,
        user_id,
        text: text.to_string(),
        created_at,
    };
    data.messages.insert(message.id, message.clone());
    Ok(message)
}

/// Likes the message for `user_id`, or removes the like if one exists.
pub fn toggle_like(
    data: &mut AppData,
    message_id: u64,
    user_id: u64,
) -> Result<LikeResponse, AppError> {
    if !data.messages.contains_key(&message_id) {
        return Err(AppError::not_found(format!("message {message_id} not found")));
    }

    let key = (message_id, user_id);
    let liked = if data.likes.remove(&key) {
        false
    } else {
        data.likes.insert(key);
        true
    };

    Ok(LikeResponse {
        message_id,
        liked,
        likes: like_count(data, message_id),
        total_likes: data.likes.len() as u64,
    })
}

pub fn message(data: &AppData, message_id: u64) -> Result<MessageView, AppError> {
    data.messages
        .get(&message_id)
        .map(|message| to_view(data, message))
        .ok_or_else(|| AppError::not_found(format!("message {message_id} not found")))
}

/// Removes a message and its likes. Only the author may delete.
pub fn delete_message(
    data: &mut AppData,
    message_id: u64,
    user_id: u64,
) -> Result<Message, AppError> {
    match data.messages.get(&message_id) {
        None => return Err(AppError::not_found(format!("message {message_id} not found"))),
        Some(message) if message.user_id != user_id => {
            return Err(AppError::forbidden("only the author may delete a message"));
        }
        Some(_) => {}
    }

    data.likes.retain(|(liked, _)| *liked != message_id);
    data.messages
        .remove(&message_id)
        .ok_or_else(|| AppError::not_found(format!("message {message_id} not found")))
}

pub fn like_count(data: &AppData, message_id: u64) -> u64 {
    data.likes
        .range((message_id, u64::MIN)..=(message_id, u64::MAX))
        .count() as u64
}

/// Newest first, at most `limit` entries.
pub fn recent_messages(data: &AppData, limit: usize) -> Vec<MessageView> {
    data.messages
        .values()
        .rev()
        .take(limit)
        .map(|message| to_view(data, message))
        .collect()
}

pub fn liked_messages(data: &AppData, user_id: u64) -> Result<Vec<MessageView>, AppError> {
    if !data.users.contains_key(&user_id) {
        return Err(AppError::not_found(format!("user {user_id} not found")));
    }

    let mut liked: Vec<MessageView> = data
        .likes
        .iter()
        .filter(|(_, liker)| *liker == user_id)
        .filter_map(|(message_id, _)| data.messages.get(message_id))
        .map(|message| to_view(data, message))
        .collect();
    liked.sort_by(|a, b| b.id.cmp(&a.id));
    Ok(liked)
}

pub fn search_users(data: &AppData, query: Option<&str>) -> Vec<User> {
    let query = query.map(str::trim).filter(|q| !q.is_empty());
    data.users
        .values()
        .filter(|user| query.is_none_or(|q| user.username.contains(q)))
        .cloned()
        .collect()
}

pub fn usernames(data: &AppData) -> Vec<String> {
    let mut names: Vec<String> = data.users.values().map(|user| user.username.clone()).collect();
    names.sort();
    names
}

pub fn to_view(data: &AppData, message: &Message) -> MessageView {
    let username = data
        .users
        .get(&message.user_id)
        .map(|user| user.username.clone())
        .unwrap_or_default();

    MessageView {
        id: message.id,
        user_id: message.user_id,
        username,
        text: message.text.clone(),
        created_at: message.created_at.clone(),
        likes: like_count(data, message.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: &str = "2026-01-05T12:00:00+00:00";

    fn seeded() -> (AppData, User, User) {
        let mut data = AppData::default();
        let alice = create_user(&mut data, "alice").unwrap();
        let bob = create_user(&mut data, "bob").unwrap();
        (data, alice, bob)
    }

    #[test]
    fn duplicate_username_is_a_conflict() {
        let (mut data, _, _) = seeded();
        let err = create_user(&mut data, " alice ").unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::CONFLICT);
        assert_eq!(err.message, "Username already taken");
    }

    #[test]
    fn ensure_user_creates_only_once() {
        let mut data = AppData::default();
        let (first, created) = ensure_user(&mut data, "guest").unwrap();
        assert!(created);
        let (second, created) = ensure_user(&mut data, "guest").unwrap();
        assert!(!created);
        assert_eq!(first, second);
        assert_eq!(data.users.len(), 1);
    }

    #[test]
    fn message_text_is_validated() {
        let (mut data, alice, _) = seeded();
        let empty = create_message(&mut data, alice.id, "   ", NOW.into()).unwrap_err();
        assert_eq!(empty.status, axum::http::StatusCode::BAD_REQUEST);

        let long = "x".repeat(MAX_MESSAGE_CHARS + 1);
        assert!(create_message(&mut data, alice.id, &long, NOW.into()).is_err());

        let exact = "é".repeat(MAX_MESSAGE_CHARS);
        assert!(create_message(&mut data, alice.id, &exact, NOW.into()).is_ok());
    }

    #[test]
    fn toggling_twice_unlikes() {
        let (mut data, alice, bob) = seeded();
        let message = create_message(&mut data, alice.id, "hello", NOW.into()).unwrap();

        let first = toggle_like(&mut data, message.id, bob.id).unwrap();
        assert!(first.liked);
        assert_eq!(first.likes, 1);

        let second = toggle_like(&mut data, message.id, bob.id).unwrap();
        assert!(!second.liked);
        assert_eq!(second.likes, 0);
    }

    #[test]
    fn likes_from_distinct_users_accumulate() {
        let (mut data, alice, bob) = seeded();
        let message = create_message(&mut data, alice.id, "hello", NOW.into()).unwrap();
        let other = create_message(&mut data, alice.id, "other", NOW.into()).unwrap();

        toggle_like(&mut data, message.id, alice.id).unwrap();
        let response = toggle_like(&mut data, message.id, bob.id).unwrap();
        toggle_like(&mut data, other.id, bob.id).unwrap();

        assert_eq!(response.likes, 2);
        assert_eq!(like_count(&data, other.id), 1);
    }

    #[test]
    fn liking_unknown_message_is_not_found() {
        let (mut data, alice, _) = seeded();
        let err = toggle_like(&mut data, 42, alice.id).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::NOT_FOUND);
        assert!(data.likes.is_empty());
    }

    #[test]
    fn toggle_reports_total_likes() {
        let (mut data, alice, bob) = seeded();
        let first = create_message(&mut data, alice.id, "first", NOW.into()).unwrap();
        let second = create_message(&mut data, alice.id, "second", NOW.into()).unwrap();

        toggle_like(&mut data, first.id, bob.id).unwrap();
        let response = toggle_like(&mut data, second.id, bob.id).unwrap();
        assert_eq!(response.likes, 1);
        assert_eq!(response.total_likes, 2);
    }

    #[test]
    fn message_lookup_reports_likes_or_not_found() {
        let (mut data, alice, bob) = seeded();
        let posted = create_message(&mut data, alice.id, "hello", NOW.into()).unwrap();
        toggle_like(&mut data, posted.id, bob.id).unwrap();

        let view = message(&data, posted.id).unwrap();
        assert_eq!(view.text, "hello");
        assert_eq!(view.likes, 1);

        let err = message(&data, 99).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn delete_drops_the_message_and_its_likes() {
        let (mut data, alice, bob) = seeded();
        let doomed = create_message(&mut data, alice.id, "doomed", NOW.into()).unwrap();
        let kept = create_message(&mut data, alice.id, "kept", NOW.into()).unwrap();
        toggle_like(&mut data, doomed.id, alice.id).unwrap();
        toggle_like(&mut data, doomed.id, bob.id).unwrap();
        toggle_like(&mut data, kept.id, bob.id).unwrap();

        let removed = delete_message(&mut data, doomed.id, alice.id).unwrap();
        assert_eq!(removed.id, doomed.id);
        assert_eq!(like_count(&data, doomed.id), 0);
        assert_eq!(like_count(&data, kept.id), 1);
        assert_eq!(data.likes.len(), 1);
        assert!(message(&data, doomed.id).is_err());
        assert_eq!(liked_messages(&data, bob.id).unwrap().len(), 1);
    }

    #[test]
    fn only_the_author_may_delete() {
        let (mut data, alice, bob) = seeded();
        let posted = create_message(&mut data, alice.id, "mine", NOW.into()).unwrap();
        toggle_like(&mut data, posted.id, bob.id).unwrap();

        let err = delete_message(&mut data, posted.id, bob.id).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::FORBIDDEN);
        assert!(data.messages.contains_key(&posted.id));
        assert_eq!(like_count(&data, posted.id), 1);

        let missing = delete_message(&mut data, 99, alice.id).unwrap_err();
        assert_eq!(missing.status, axum::http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn recent_messages_are_newest_first_and_limited() {
        let (mut data, alice, _) = seeded();
        for n in 0..5 {
            create_message(&mut data, alice.id, &format!("warble {n}"), NOW.into()).unwrap();
        }

        let recent = recent_messages(&data, 3);
        let texts: Vec<&str> = recent.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["warble 4", "warble 3", "warble 2"]);
        assert!(recent.iter().all(|m| m.username == "alice"));
    }

    #[test]
    fn liked_messages_lists_only_that_users_likes() {
        let (mut data, alice, bob) = seeded();
        let first = create_message(&mut data, alice.id, "first", NOW.into()).unwrap();
        let second = create_message(&mut data, alice.id, "second", NOW.into()).unwrap();
        toggle_like(&mut data, first.id, bob.id).unwrap();
        toggle_like(&mut data, second.id, bob.id).unwrap();
        toggle_like(&mut data, second.id, alice.id).unwrap();

        let liked = liked_messages(&data, bob.id).unwrap();
        assert_eq!(liked.iter().map(|m| m.id).collect::<Vec<_>>(), [second.id, first.id]);
        assert_eq!(liked_messages(&data, alice.id).unwrap().len(), 1);
        assert!(liked_messages(&data, 99).is_err());
    }

    #[test]
    fn search_and_usernames() {
        let (mut data, _, _) = seeded();
        create_user(&mut data, "alicia").unwrap();

        let found = search_users(&data, Some("ali"));
        assert_eq!(found.len(), 2);
        assert_eq!(search_users(&data, Some("  ")).len(), 3);
        assert_eq!(search_users(&data, None).len(), 3);
        assert_eq!(usernames(&data), ["alice", "alicia", "bob"]);
    }
}
