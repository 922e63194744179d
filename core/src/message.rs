//! Single-slot transient notification.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Info => f.write_str("info"),
            MessageKind::Success => f.write_str("success"),
            MessageKind::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

/// At most one message is visible; every `show` overwrites the last.
#[derive(Debug, Clone, Default)]
pub struct MessageSlot {
    current: Option<Message>,
}

impl MessageSlot {
    pub fn current(&self) -> Option<&Message> {
        self.current.as_ref()
    }

    pub fn show(&mut self, kind: MessageKind, text: impl Into<String>) {
        let text = text.into();
        // An empty text is the same as no message.
        self.current = (!text.is_empty()).then_some(Message { kind, text });
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.show(MessageKind::Info, text);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.show(MessageKind::Success, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.show(MessageKind::Error, text);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
