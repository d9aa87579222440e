//! In-process implementation of the chat SDK contracts.
//!
//! Backs transcript replay from the CLI and end-to-end tests. State lives
//! behind `Arc<Mutex<_>>` so subscription handles can unregister themselves
//! after the client has been moved around.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, MutexGuard, Weak},
};

use crate::{
    domain::{
        channel::Channel,
        events::ClientEvent,
        ids::{ChannelId, MessageId, UserId},
        message::{MessageRecord, User},
    },
    usecases::{
        compose::{TypingSource, TypingSourceError},
        contracts::{ClientEventListener, ClientEvents, Subscription},
        load_messages::{MessagePage, MessagesSource, MessagesSourceError},
        login::{Credentials, LoginSource, LoginSourceError},
        send_message::{MessageSender, SendMessageSourceError},
    },
};

const LISTENER_REGISTERED: &str = "MEMORY_CLIENT_LISTENER_REGISTERED";
const LISTENER_REMOVED: &str = "MEMORY_CLIENT_LISTENER_REMOVED";
const OFFLINE_DETAIL: &str = "connection refused: client is offline";

type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

#[derive(Debug, Clone)]
struct Account {
    email: String,
    password: String,
    user_id: UserId,
}

#[derive(Debug, Default)]
struct MemoryState {
    channels: HashMap<ChannelId, Channel>,
    users: HashMap<UserId, User>,
    messages: Vec<MessageRecord>,
    accounts: Vec<Account>,
    session: Option<UserId>,
    /// Set by an explicit logout; history reads are refused until the next sign-in.
    logged_out: bool,
    offline: bool,
    next_message_seq: u64,
}

#[derive(Default)]
struct ListenerRegistry {
    next_id: u64,
    listeners: Vec<(u64, Box<dyn ClientEventListener + Send>)>,
}

#[derive(Clone)]
pub struct MemoryChatClient {
    state: Arc<Mutex<MemoryState>>,
    registry: Arc<Mutex<ListenerRegistry>>,
    clock: Clock,
}

impl Default for MemoryChatClient {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryChatClient")
            .field("listeners", &self.listener_count())
            .finish_non_exhaustive()
    }
}

impl MemoryChatClient {
    pub fn new() -> Self {
        Self::with_clock(|| chrono::Utc::now().timestamp_millis())
    }

    /// Builds a client whose created messages are stamped by `clock`.
    pub fn with_clock(clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            registry: Arc::new(Mutex::new(ListenerRegistry::default())),
            clock: Arc::new(clock),
        }
    }

    pub fn add_channel(&self, channel: Channel) {
        self.lock_state()
            .channels
            .insert(channel.id.clone(), channel);
    }

    pub fn add_user(&self, user: User) {
        self.lock_state().users.insert(user.id.clone(), user);
    }

    pub fn register_account(&self, email: &str, password: &str, user: User) {
        let mut state = self.lock_state();
        state.accounts.push(Account {
            email: email.to_owned(),
            password: password.to_owned(),
            user_id: user.id.clone(),
        });
        state.users.insert(user.id.clone(), user);
    }

    /// Appends a historical message without notifying listeners.
    pub fn add_message(&self, record: MessageRecord) {
        self.lock_state().messages.push(record);
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn set_offline(&self, offline: bool) {
        self.lock_state().offline = offline;
    }

    pub fn session_user(&self) -> Option<User> {
        let state = self.lock_state();
        state
            .session
            .as_ref()
            .and_then(|id| state.users.get(id))
            .cloned()
    }

    pub fn listener_count(&self) -> usize {
        self.lock_registry().listeners.len()
    }

    /// Feeds an event as if it came from the server: the local log is
    /// updated first, then every listener is notified.
    pub fn deliver(&self, event: ClientEvent) {
        {
            let mut state = self.lock_state();
            match &event {
                ClientEvent::MessageCreated(record) => state.messages.push(record.clone()),
                ClientEvent::Ready { user } => {
                    state.users.insert(user.id.clone(), user.clone());
                    state.session = Some(user.id.clone());
                    state.logged_out = false;
                }
                ClientEvent::LoggedOut => {
                    state.session = None;
                    state.logged_out = true;
                }
                ClientEvent::TypingStarted { .. } | ClientEvent::TypingStopped { .. } => {}
            }
        }

        self.emit(&event);
    }

    fn emit(&self, event: &ClientEvent) {
        let mut registry = self.lock_registry();
        for (_, listener) in registry.listeners.iter_mut() {
            listener.on_event(event);
        }
    }

    fn signed_in(&self) -> Option<UserId> {
        self.lock_state().session.clone()
    }

    fn lock_state(&self) -> MutexGuard<'_, MemoryState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_registry(&self) -> MutexGuard<'_, ListenerRegistry> {
        lock_registry(&self.registry)
    }

    fn typing_event(&self, channel_id: &ChannelId, started: bool) -> Result<(), TypingSourceError> {
        {
            let state = self.lock_state();
            if state.offline {
                return Err(TypingSourceError::Unavailable);
            }
        }
        let user_id = self.signed_in().ok_or(TypingSourceError::Unauthorized)?;

        let channel_id = channel_id.clone();
        let user_id = Some(user_id);
        let event = if started {
            ClientEvent::TypingStarted {
                channel_id,
                user_id,
            }
        } else {
            ClientEvent::TypingStopped {
                channel_id,
                user_id,
            }
        };
        self.emit(&event);

        Ok(())
    }
}

fn lock_registry(registry: &Mutex<ListenerRegistry>) -> MutexGuard<'_, ListenerRegistry> {
    registry
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ClientEvents for MemoryChatClient {
    fn subscribe(&self, listener: Box<dyn ClientEventListener + Send>) -> Subscription {
        let id = {
            let mut registry = self.lock_registry();
            registry.next_id += 1;
            let id = registry.next_id;
            registry.listeners.push((id, listener));
            id
        };
        tracing::debug!(code = LISTENER_REGISTERED, listener_id = id, "listener registered");

        let registry: Weak<Mutex<ListenerRegistry>> = Arc::downgrade(&self.registry);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                lock_registry(&registry)
                    .listeners
                    .retain(|(listener_id, _)| *listener_id != id);
                tracing::debug!(code = LISTENER_REMOVED, listener_id = id, "listener removed");
            }
        })
    }
}

impl MessagesSource for MemoryChatClient {
    fn list_messages(
        &self,
        channel_id: &ChannelId,
        limit: usize,
    ) -> Result<MessagePage, MessagesSourceError> {
        let state = self.lock_state();
        if state.offline {
            return Err(MessagesSourceError::Unavailable);
        }
        if state.logged_out {
            return Err(MessagesSourceError::Unauthorized);
        }
        if !state.channels.contains_key(channel_id) {
            return Err(MessagesSourceError::ChannelNotFound);
        }

        let messages: Vec<MessageRecord> = state
            .messages
            .iter()
            .rev()
            .filter(|record| &record.channel_id == channel_id)
            .take(limit)
            .cloned()
            .collect();

        let mut authors: Vec<User> = Vec::new();
        for record in &messages {
            if authors.iter().any(|user| user.id == record.author_id) {
                continue;
            }
            if let Some(user) = state.users.get(&record.author_id) {
                authors.push(user.clone());
            }
        }

        Ok(MessagePage { messages, authors })
    }
}

impl MessageSender for MemoryChatClient {
    fn send_message(
        &self,
        channel_id: &ChannelId,
        content: &str,
    ) -> Result<MessageRecord, SendMessageSourceError> {
        let record = {
            let mut state = self.lock_state();
            if state.offline {
                return Err(SendMessageSourceError::Unavailable);
            }
            let author_id = state
                .session
                .clone()
                .ok_or(SendMessageSourceError::Unauthorized)?;
            if !state.channels.contains_key(channel_id) {
                return Err(SendMessageSourceError::ChannelNotFound);
            }

            state.next_message_seq += 1;
            let record = MessageRecord {
                id: MessageId::new(format!("local-{}", state.next_message_seq)),
                channel_id: channel_id.clone(),
                author_id,
                content: content.to_owned(),
                created_at_ms: (self.clock)(),
                masquerade: None,
                system_message: false,
                reply_ids: Vec::new(),
            };
            state.messages.push(record.clone());
            record
        };

        self.emit(&ClientEvent::MessageCreated(record.clone()));
        Ok(record)
    }
}

impl TypingSource for MemoryChatClient {
    fn start_typing(&self, channel_id: &ChannelId) -> Result<(), TypingSourceError> {
        self.typing_event(channel_id, true)
    }

    fn stop_typing(&self, channel_id: &ChannelId) -> Result<(), TypingSourceError> {
        self.typing_event(channel_id, false)
    }
}

impl LoginSource for MemoryChatClient {
    fn login(&self, credentials: &Credentials) -> Result<User, LoginSourceError> {
        let user = {
            let mut state = self.lock_state();
            if state.offline {
                return Err(LoginSourceError::Unavailable {
                    detail: OFFLINE_DETAIL.to_owned(),
                });
            }

            let user_id = state
                .accounts
                .iter()
                .find(|account| {
                    account.email.eq_ignore_ascii_case(&credentials.email)
                        && account.password == credentials.password
                })
                .map(|account| account.user_id.clone())
                .ok_or(LoginSourceError::InvalidCredentials)?;

            let user = state
                .users
                .get(&user_id)
                .cloned()
                .ok_or(LoginSourceError::InvalidCredentials)?;
            state.session = Some(user_id);
            state.logged_out = false;
            user
        };

        self.emit(&ClientEvent::Ready { user: user.clone() });
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::test_support::{message, user, TEST_CHANNEL};

    fn client() -> MemoryChatClient {
        let client = MemoryChatClient::with_clock(|| 1_000);
        client.add_channel(Channel {
            id: ChannelId::from(TEST_CHANNEL),
            name: "general".to_owned(),
        });
        client
    }

    fn signed_in_client() -> MemoryChatClient {
        let client = client();
        client.deliver(ClientEvent::Ready {
            user: user("U1", "ann"),
        });
        client
    }

    fn channel_id() -> ChannelId {
        ChannelId::from(TEST_CHANNEL)
    }

    #[test]
    fn fetch_returns_latest_page_newest_first_with_authors() {
        let client = client();
        client.add_user(user("U1", "ann"));
        for n in 1..=5 {
            client.add_message(message(&format!("M{n}"), "U1", n));
        }

        let page = client.list_messages(&channel_id(), 3).expect("fetch");

        let ids: Vec<_> = page.messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["M5", "M4", "M3"]);
        assert_eq!(page.authors, vec![user("U1", "ann")]);
    }

    #[test]
    fn fetch_skips_other_channels_and_unknown_authors() {
        let client = client();
        let mut foreign = message("M2", "U1", 2);
        foreign.channel_id = ChannelId::from("C2");
        client.add_message(message("M1", "U9", 1));
        client.add_message(foreign);

        let page = client.list_messages(&channel_id(), 10).expect("fetch");

        assert_eq!(page.messages.len(), 1);
        assert!(page.authors.is_empty());
    }

    #[test]
    fn fetch_unknown_channel_fails() {
        let client = client();

        let err = client
            .list_messages(&ChannelId::from("nope"), 10)
            .expect_err("must fail");

        assert_eq!(err, MessagesSourceError::ChannelNotFound);
    }

    #[test]
    fn send_requires_session() {
        let client = client();

        let err = client
            .send_message(&channel_id(), "hi")
            .expect_err("must fail");

        assert_eq!(err, SendMessageSourceError::Unauthorized);
    }

    #[test]
    fn send_appends_and_notifies_listeners() {
        let client = signed_in_client();
        let (tx, rx) = mpsc::channel();
        let _subscription = client.subscribe(Box::new(tx));

        let record = client.send_message(&channel_id(), "hi").expect("send");

        assert_eq!(record.author_id, UserId::from("U1"));
        assert_eq!(record.created_at_ms, 1_000);
        assert_eq!(rx.try_recv(), Ok(ClientEvent::MessageCreated(record.clone())));
        let page = client.list_messages(&channel_id(), 10).expect("fetch");
        assert_eq!(page.messages, vec![record]);
    }

    #[test]
    fn offline_client_rejects_commands() {
        let client = signed_in_client();
        client.set_offline(true);

        assert_eq!(
            client.send_message(&channel_id(), "hi"),
            Err(SendMessageSourceError::Unavailable)
        );
        assert_eq!(
            client.start_typing(&channel_id()),
            Err(TypingSourceError::Unavailable)
        );
        assert_eq!(
            client.list_messages(&channel_id(), 1),
            Err(MessagesSourceError::Unavailable)
        );
    }

    #[test]
    fn typing_commands_emit_events_for_session_user() {
        let client = signed_in_client();
        let (tx, rx) = mpsc::channel();
        let _subscription = client.subscribe(Box::new(tx));

        client.start_typing(&channel_id()).expect("start");
        client.stop_typing(&channel_id()).expect("stop");

        assert_eq!(
            rx.try_iter().collect::<Vec<_>>(),
            vec![
                ClientEvent::TypingStarted {
                    channel_id: channel_id(),
                    user_id: Some(UserId::from("U1")),
                },
                ClientEvent::TypingStopped {
                    channel_id: channel_id(),
                    user_id: Some(UserId::from("U1")),
                },
            ]
        );
    }

    #[test]
    fn login_checks_registered_accounts() {
        let client = client();
        client.register_account("ann@example.org", "pw", user("U1", "ann"));
        let (tx, rx) = mpsc::channel();
        let _subscription = client.subscribe(Box::new(tx));

        let wrong = client.login(&Credentials {
            email: "ann@example.org".to_owned(),
            password: "nope".to_owned(),
        });
        assert_eq!(wrong, Err(LoginSourceError::InvalidCredentials));

        let signed_in = client
            .login(&Credentials {
                email: "ANN@example.org".to_owned(),
                password: "pw".to_owned(),
            })
            .expect("login");

        assert_eq!(signed_in.id, UserId::from("U1"));
        assert_eq!(client.session_user(), Some(user("U1", "ann")));
        assert_eq!(
            rx.try_recv(),
            Ok(ClientEvent::Ready {
                user: user("U1", "ann")
            })
        );
    }

    #[test]
    fn unsubscribed_listener_receives_nothing() {
        let client = client();
        let (tx, rx) = mpsc::channel();
        let subscription = client.subscribe(Box::new(tx));
        assert_eq!(client.listener_count(), 1);

        subscription.unsubscribe();
        client.deliver(ClientEvent::LoggedOut);

        assert_eq!(client.listener_count(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn subscription_outliving_client_is_harmless() {
        let client = client();
        let (tx, _rx) = mpsc::channel();
        let subscription = client.subscribe(Box::new(tx));

        drop(client);
        drop(subscription);
    }

    #[test]
    fn history_is_refused_after_logout_until_next_sign_in() {
        let client = signed_in_client();

        client.deliver(ClientEvent::LoggedOut);
        assert_eq!(
            client.list_messages(&channel_id(), 10),
            Err(MessagesSourceError::Unauthorized)
        );

        client.deliver(ClientEvent::Ready {
            user: user("U1", "ann"),
        });
        assert!(client.list_messages(&channel_id(), 10).is_ok());
    }

    #[test]
    fn delivered_messages_become_history() {
        let client = client();

        client.deliver(ClientEvent::MessageCreated(message("M1", "U1", 1)));

        let page = client.list_messages(&channel_id(), 10).expect("fetch");
        assert_eq!(page.messages.len(), 1);
    }
}
