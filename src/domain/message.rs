use serde::{Deserialize, Serialize};

use super::ids::{ChannelId, MessageId, UserId};

const UNKNOWN_AUTHOR: &str = "Unknown";

/// Per-message display identity override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Masquerade {
    pub name: String,
    pub avatar: String,
}

/// A message as delivered by the chat SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub id: MessageId,
    pub channel_id: ChannelId,
    pub author_id: UserId,
    pub content: String,
    pub created_at_ms: i64,
    pub masquerade: Option<Masquerade>,
    pub system_message: bool,
    pub reply_ids: Vec<MessageId>,
}

impl MessageRecord {
    pub fn is_reply(&self) -> bool {
        !self.reply_ids.is_empty()
    }

    /// Returns true when both records carry the same display override (or none).
    pub fn same_masquerade(&self, other: &MessageRecord) -> bool {
        self.masquerade == other.masquerade
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl User {
    pub fn visible_name(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ if !self.username.is_empty() => &self.username,
            _ => UNKNOWN_AUTHOR,
        }
    }
}

/// Resolves the name shown in a group header.
///
/// A masquerade wins over the real author; an author that the host does not
/// know about renders as "Unknown".
pub fn author_display_name<'a>(message: &'a MessageRecord, author: Option<&'a User>) -> &'a str {
    if let Some(masquerade) = &message.masquerade {
        return &masquerade.name;
    }

    author.map(User::visible_name).unwrap_or(UNKNOWN_AUTHOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::message;

    fn user(username: &str, display_name: Option<&str>) -> User {
        User {
            id: UserId::from("U1"),
            username: username.to_owned(),
            display_name: display_name.map(str::to_owned),
        }
    }

    #[test]
    fn visible_name_prefers_display_name() {
        assert_eq!(user("ann", Some("Ann")).visible_name(), "Ann");
    }

    #[test]
    fn visible_name_falls_back_to_username() {
        assert_eq!(user("ann", None).visible_name(), "ann");
        assert_eq!(user("ann", Some("")).visible_name(), "ann");
    }

    #[test]
    fn visible_name_is_unknown_when_everything_is_empty() {
        assert_eq!(user("", None).visible_name(), "Unknown");
    }

    #[test]
    fn masquerade_overrides_author_name() {
        let mut record = message("M1", "U1", 0);
        record.masquerade = Some(Masquerade {
            name: "Bridge".to_owned(),
            avatar: "bridge.png".to_owned(),
        });
        let author = user("ann", Some("Ann"));

        assert_eq!(author_display_name(&record, Some(&author)), "Bridge");
    }

    #[test]
    fn missing_author_renders_unknown() {
        let record = message("M1", "U1", 0);

        assert_eq!(author_display_name(&record, None), "Unknown");
    }

    #[test]
    fn masquerades_compare_by_name_and_avatar() {
        let bridge = |avatar: &str| Masquerade {
            name: "Bridge".to_owned(),
            avatar: avatar.to_owned(),
        };
        let mut a = message("M1", "U1", 0);
        let mut b = message("M2", "U1", 0);
        assert!(a.same_masquerade(&b));

        a.masquerade = Some(bridge("x.png"));
        assert!(!a.same_masquerade(&b));

        b.masquerade = Some(bridge("x.png"));
        assert!(a.same_masquerade(&b));

        b.masquerade = Some(bridge("y.png"));
        assert!(!a.same_masquerade(&b));
    }

    #[test]
    fn reply_detection_uses_reply_ids() {
        let mut record = message("M1", "U1", 0);
        assert!(!record.is_reply());

        record.reply_ids.push(MessageId::from("M0"));
        assert!(record.is_reply());
    }
}
