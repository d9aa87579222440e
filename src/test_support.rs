use chrono::DateTime;

use crate::domain::{
    ids::{ChannelId, MessageId, UserId},
    message::{MessageRecord, User},
};

pub const TEST_CHANNEL: &str = "C1";

/// Parses an RFC 3339 timestamp into epoch milliseconds.
pub fn at(rfc3339: &str) -> i64 {
    DateTime::parse_from_rfc3339(rfc3339)
        .expect("fixture timestamp should be valid")
        .timestamp_millis()
}

pub fn minutes(count: i64) -> i64 {
    count * 60_000
}

pub fn message(id: &str, author: &str, created_at_ms: i64) -> MessageRecord {
    MessageRecord {
        id: MessageId::from(id),
        channel_id: ChannelId::from(TEST_CHANNEL),
        author_id: UserId::from(author),
        content: format!("content of {id}"),
        created_at_ms,
        masquerade: None,
        system_message: false,
        reply_ids: Vec::new(),
    }
}

pub fn user(id: &str, username: &str) -> User {
    User {
        id: UserId::from(id),
        username: username.to_owned(),
        display_name: None,
    }
}
