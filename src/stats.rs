use crate::models::{AppData, StatsResponse};

pub fn build_stats(data: &AppData) -> StatsResponse {
    StatsResponse {
        users: data.users.len() as u64,
        messages: data.messages.len() as u64,
        likes: data.likes.len() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{create_message, create_user, toggle_like};

    #[test]
    fn stats_count_each_collection() {
        let mut data = AppData::default();
        let alice = create_user(&mut data, "alice").unwrap();
        let bob = create_user(&mut data, "bob").unwrap();
        let message =
            create_message(&mut data, alice.id, "hi", "2026-01-05T00:00:00+00:00".into()).unwrap();
        toggle_like(&mut data, message.id, alice.id).unwrap();
        toggle_like(&mut data, message.id, bob.id).unwrap();

        let stats = build_stats(&data);
        assert_eq!(stats, StatsResponse { users: 2, messages: 1, likes: 2 });
    }

    #[test]
    fn stats_of_empty_data_are_zero() {
        let stats = build_stats(&AppData::default());
        assert_eq!(stats.users + stats.messages + stats.likes, 0);
    }
}
