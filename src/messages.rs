/// Runtime messages exchanged between extension contexts, and the display page's message board

use serde::{Deserialize, Serialize};

/// `{action, message}` envelope sent with `chrome.runtime.sendMessage`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum RuntimeMessage {
    Log { message: String },
    LogMessage { message: String },
    /// Shown to the user on the display page
    UserMessage { message: String },
    /// Ask the service worker to focus or open the display page
    OpenDisplayPage,
}

impl RuntimeMessage {
    pub fn user(message: impl Into<String>) -> Self {
        RuntimeMessage::UserMessage {
            message: message.into(),
        }
    }

    pub fn log(message: impl Into<String>) -> Self {
        RuntimeMessage::LogMessage {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub text: String,
}

/// Transient messages on the display page; each one is dismissed after a fixed delay
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageBoard {
    pub entries: Vec<Toast>,
    next_id: u32,
}

impl MessageBoard {
    pub fn push(&mut self, text: impl Into<String>) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push(Toast {
            id,
            text: text.into(),
        });
        id
    }

    /// Remove a message; already-dismissed ids are ignored
    pub fn dismiss(&mut self, id: u32) {
        self.entries.retain(|t| t.id != id);
    }
}
