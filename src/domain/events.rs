use super::{
    ids::{ChannelId, UserId},
    message::{MessageRecord, User},
};

/// Events pushed by the chat SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    Ready { user: User },
    LoggedOut,
    MessageCreated(MessageRecord),
    TypingStarted {
        channel_id: ChannelId,
        user_id: Option<UserId>,
    },
    TypingStopped {
        channel_id: ChannelId,
        user_id: Option<UserId>,
    },
}

impl ClientEvent {
    /// Channel the event is scoped to, if any.
    pub fn channel_id(&self) -> Option<&ChannelId> {
        match self {
            ClientEvent::MessageCreated(record) => Some(&record.channel_id),
            ClientEvent::TypingStarted { channel_id, .. }
            | ClientEvent::TypingStopped { channel_id, .. } => Some(channel_id),
            ClientEvent::Ready { .. } | ClientEvent::LoggedOut => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ClientEvent::Ready { .. } => "ready",
            ClientEvent::LoggedOut => "logged_out",
            ClientEvent::MessageCreated(_) => "message_created",
            ClientEvent::TypingStarted { .. } => "typing_started",
            ClientEvent::TypingStopped { .. } => "typing_stopped",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{message, user};

    #[test]
    fn channel_scope_is_reported_for_channel_events() {
        let created = ClientEvent::MessageCreated(message("M1", "U1", 0));
        let typing = ClientEvent::TypingStopped {
            channel_id: ChannelId::from("C9"),
            user_id: None,
        };

        assert_eq!(created.channel_id(), Some(&ChannelId::from("C1")));
        assert_eq!(typing.channel_id(), Some(&ChannelId::from("C9")));
    }

    #[test]
    fn session_events_have_no_channel() {
        let ready = ClientEvent::Ready {
            user: user("U1", "ann"),
        };

        assert_eq!(ready.channel_id(), None);
        assert_eq!(ClientEvent::LoggedOut.channel_id(), None);
        assert_eq!(ready.kind(), "ready");
    }
}
