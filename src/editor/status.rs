use std::time::{Duration, Instant};

const MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Message-bar text. It is never cleared; it just stops being drawn once it
/// is older than five seconds.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    text: String,
    created_at: Instant,
}

impl StatusMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self::at(text, Instant::now())
    }

    pub fn at(text: impl Into<String>, created_at: Instant) -> Self {
        StatusMessage {
            text: text.into(),
            created_at,
        }
    }

    #[cfg(test)]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn visible_at(&self, now: Instant) -> Option<&str> {
        let age = now.saturating_duration_since(self.created_at);
        if self.text.is_empty() || age >= MESSAGE_TIMEOUT {
            None
        } else {
            Some(&self.text)
        }
    }
}

impl Default for StatusMessage {
    fn default() -> Self {
        Self::new(String::new())
    }
}
