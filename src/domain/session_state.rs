use super::{events::ClientEvent, ids::UserId, message::User};

/// Who is signed in, as last reported by the SDK.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    user: Option<User>,
}

impl SessionState {
    pub fn signed_in(user: User) -> Self {
        Self { user: Some(user) }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_self(&self, author_id: &UserId) -> bool {
        self.user.as_ref().is_some_and(|user| &user.id == author_id)
    }

    pub fn apply(&mut self, event: &ClientEvent) {
        match event {
            ClientEvent::Ready { user } => self.user = Some(user.clone()),
            ClientEvent::LoggedOut => self.user = None,
            _ => {}
        }
    }
}
