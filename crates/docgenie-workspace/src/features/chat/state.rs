use docgenie_core::api::ChatMessage;

/// Shown whenever a view has no messages yet.
pub const PLACEHOLDER: &str = "Ask questions about your document!";

/// Rendered transcript for the current view.
///
/// The server owns the real message log; this is append-only between view
/// changes and replaced wholesale when a session is applied.
#[derive(Debug, Clone)]
pub struct ChatState {
    transcript: Vec<ChatMessage>,
    pending: usize,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            transcript: vec![ChatMessage::system(PLACEHOLDER)],
            pending: 0,
        }
    }
}

impl ChatState {
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Number of sent messages still waiting for a reply.
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn replace(&mut self, messages: Vec<ChatMessage>) {
        if messages.is_empty() {
            self.reset();
        } else {
            self.transcript = messages;
            self.pending = 0;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.transcript.push(ChatMessage::user(text));
        self.pending += 1;
    }

    pub fn push_reply(&mut self, text: impl Into<String>) {
        self.transcript.push(ChatMessage::ai(text));
        self.pending = self.pending.saturating_sub(1);
    }

    /// A send resolved without a reply; the user's message stays.
    pub fn mark_failed(&mut self) {
        self.pending = self.pending.saturating_sub(1);
    }
}
