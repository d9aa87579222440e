//! Throttling of outbound typing notifications from the compose box.

/// Minimum delay between two `start typing` notifications.
pub const DEFAULT_TYPING_SEND_INTERVAL_MS: u64 = 4_000;
/// Idle time after the last keystroke before `stop typing` is sent.
pub const DEFAULT_TYPING_IDLE_TIMEOUT_MS: u64 = 3_000;

/// Command the compose box should forward to the SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingCommand {
    Start,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingTimings {
    pub send_interval_ms: u64,
    pub idle_timeout_ms: u64,
}

impl Default for TypingTimings {
    fn default() -> Self {
        Self {
            send_interval_ms: DEFAULT_TYPING_SEND_INTERVAL_MS,
            idle_timeout_ms: DEFAULT_TYPING_IDLE_TIMEOUT_MS,
        }
    }
}

/// Clock-driven typing state. Time is always passed in by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypingThrottle {
    timings: TypingTimings,
    typing: bool,
    last_start_sent_ms: Option<u64>,
    idle_deadline_ms: Option<u64>,
}

impl TypingThrottle {
    pub fn new(timings: TypingTimings) -> Self {
        Self {
            timings,
            ..Self::default()
        }
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn idle_deadline_ms(&self) -> Option<u64> {
        self.idle_deadline_ms
    }

    /// Handles an edit of the compose text.
    pub fn on_input(&mut self, text: &str, now_ms: u64) -> Option<TypingCommand> {
        if text.trim().is_empty() {
            return self.stop();
        }

        let due = self
            .last_start_sent_ms
            .is_none_or(|sent| now_ms.saturating_sub(sent) > self.timings.send_interval_ms);

        self.idle_deadline_ms = Some(now_ms.saturating_add(self.timings.idle_timeout_ms));

        if due {
            self.last_start_sent_ms = Some(now_ms);
            self.typing = true;
            Some(TypingCommand::Start)
        } else {
            None
        }
    }

    /// Fires the idle timeout once its deadline has passed.
    pub fn on_tick(&mut self, now_ms: u64) -> Option<TypingCommand> {
        match self.idle_deadline_ms {
            Some(deadline) if now_ms >= deadline => self.stop(),
            _ => None,
        }
    }

    /// The message is about to be sent.
    pub fn on_send(&mut self) -> Option<TypingCommand> {
        self.stop()
    }

    /// The compose box goes away (channel switch, teardown).
    pub fn on_close(&mut self) -> Option<TypingCommand> {
        self.stop()
    }

    fn stop(&mut self) -> Option<TypingCommand> {
        self.idle_deadline_ms = None;
        if self.typing {
            self.typing = false;
            Some(TypingCommand::Stop)
        } else {
            None
        }
    }
}
