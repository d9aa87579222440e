//! JSON transcript files replayed by the `render` command.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
    domain::{
        channel::Channel,
        events::ClientEvent,
        grouping::TranscriptOrder,
        ids::{ChannelId, MessageId, UserId},
        message::{Masquerade, MessageRecord, User},
    },
    infra::{error::AppError, memory_client::MemoryChatClient, secrets::mask_email},
};

#[derive(Debug, Deserialize)]
struct TranscriptFile {
    channel: Channel,
    #[serde(default)]
    self_id: Option<UserId>,
    #[serde(default)]
    order: TranscriptOrder,
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    accounts: Vec<Account>,
    #[serde(default)]
    messages: Vec<FileMessage>,
    #[serde(default)]
    events: Vec<FileEvent>,
}

/// Sign-in credentials the in-memory SDK accepts.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Account {
    pub email: String,
    pub password: String,
    pub user_id: UserId,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("email", &mask_email(&self.email))
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct FileMessage {
    id: MessageId,
    #[serde(default)]
    channel_id: Option<ChannelId>,
    author_id: UserId,
    #[serde(default)]
    content: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    masquerade: Option<Masquerade>,
    #[serde(default)]
    system_message: bool,
    #[serde(default)]
    reply_ids: Vec<MessageId>,
}

impl FileMessage {
    fn into_record(self, default_channel: &ChannelId) -> MessageRecord {
        MessageRecord {
            id: self.id,
            channel_id: self.channel_id.unwrap_or_else(|| default_channel.clone()),
            author_id: self.author_id,
            content: self.content,
            created_at_ms: self.created_at.timestamp_millis(),
            masquerade: self.masquerade,
            system_message: self.system_message,
            reply_ids: self.reply_ids,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum FileEvent {
    MessageCreated {
        message: FileMessage,
    },
    TypingStarted {
        #[serde(default)]
        channel_id: Option<ChannelId>,
        #[serde(default)]
        user_id: Option<UserId>,
    },
    TypingStopped {
        #[serde(default)]
        channel_id: Option<ChannelId>,
        #[serde(default)]
        user_id: Option<UserId>,
    },
    LoggedOut,
}

impl FileEvent {
    fn into_event(self, default_channel: &ChannelId) -> ClientEvent {
        let scoped = |channel_id: Option<ChannelId>| {
            channel_id.unwrap_or_else(|| default_channel.clone())
        };

        match self {
            FileEvent::MessageCreated { message } => {
                ClientEvent::MessageCreated(message.into_record(default_channel))
            }
            FileEvent::TypingStarted {
                channel_id,
                user_id,
            } => ClientEvent::TypingStarted {
                channel_id: scoped(channel_id),
                user_id,
            },
            FileEvent::TypingStopped {
                channel_id,
                user_id,
            } => ClientEvent::TypingStopped {
                channel_id: scoped(channel_id),
                user_id,
            },
            FileEvent::LoggedOut => ClientEvent::LoggedOut,
        }
    }
}

/// A parsed transcript: history oldest-first plus live events to replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub channel: Channel,
    pub self_user: Option<User>,
    pub users: Vec<User>,
    pub accounts: Vec<Account>,
    pub history: Vec<MessageRecord>,
    pub events: Vec<ClientEvent>,
}

impl Transcript {
    /// Loads history into `client` and restores the session, if any.
    pub fn seed(&self, client: &MemoryChatClient) {
        client.add_channel(self.channel.clone());
        for user in &self.users {
            client.add_user(user.clone());
        }
        for account in &self.accounts {
            if let Some(user) = self.users.iter().find(|user| user.id == account.user_id) {
                client.register_account(&account.email, &account.password, user.clone());
            }
        }
        for record in &self.history {
            client.add_message(record.clone());
        }
        if let Some(user) = &self.self_user {
            client.deliver(ClientEvent::Ready { user: user.clone() });
        }
    }
}

pub fn load(path: &Path) -> Result<Transcript, AppError> {
    let raw = fs::read_to_string(path).map_err(|source| AppError::TranscriptRead {
        path: path.to_path_buf(),
        source,
    })?;

    parse(&raw, path)
}

fn parse(raw: &str, path: &Path) -> Result<Transcript, AppError> {
    let file: TranscriptFile =
        serde_json::from_str(raw).map_err(|source| AppError::TranscriptParse {
            path: path.to_path_buf(),
            source,
        })?;

    let invalid = |reason: String| AppError::TranscriptInvalid {
        path: PathBuf::from(path),
        reason,
    };

    let self_user = match &file.self_id {
        Some(id) => Some(
            file.users
                .iter()
                .find(|user| &user.id == id)
                .cloned()
                .ok_or_else(|| invalid(format!("self_id `{id}` is not listed in users")))?,
        ),
        None => None,
    };

    if let Some(account) = file
        .accounts
        .iter()
        .find(|account| !file.users.iter().any(|user| user.id == account.user_id))
    {
        return Err(invalid(format!(
            "account `{}` names unknown user `{}`",
            mask_email(&account.email),
            account.user_id
        )));
    }

    let channel_id = file.channel.id.clone();
    let mut history: Vec<MessageRecord> = file
        .messages
        .into_iter()
        .map(|message| message.into_record(&channel_id))
        .collect();
    if file.order == TranscriptOrder::NewestFirst {
        history.reverse();
    }

    let events = file
        .events
        .into_iter()
        .map(|event| event.into_event(&channel_id))
        .collect();

    Ok(Transcript {
        channel: file.channel,
        self_user,
        users: file.users,
        accounts: file.accounts,
        history,
        events,
    })
}
