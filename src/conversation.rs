//! Conversation state and its transitions
//!
//! Everything here is synchronous and UI-agnostic. The app calls these
//! transitions from the run loop, so the transcript is only ever mutated on
//! one task.

use serde::{Deserialize, Serialize};

/// Greeting shown as the first assistant message of every session
pub const GREETING: &str = "Hi, I'm your Personal ChatBot. How can I assist you today?";

/// Appended (never overwritten) when a completion request fails
pub const FAILURE_NOTICE: &str = "Sorry, something went wrong.";

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single chat turn. Position in the conversation is its only identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered, append-only chat history. Insertion order is display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Fresh session: a single assistant greeting, no user turns.
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::assistant(greeting)],
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Submit the draft.
    ///
    /// Returns `None` without touching anything when the draft is blank.
    /// Otherwise appends the user turn and an empty assistant placeholder,
    /// clears the draft, and returns the messages to send: the history as it
    /// stood before this call followed by the new user turn.
    pub fn submit(&mut self, draft: &mut String) -> Option<Vec<Message>> {
        if draft.trim().is_empty() {
            return None;
        }

        let content = std::mem::take(draft);
        let user = Message::user(content);

        let mut outgoing = Vec::with_capacity(self.messages.len() + 1);
        outgoing.extend_from_slice(&self.messages);
        outgoing.push(user.clone());

        self.messages.push(user);
        self.messages.push(Message::assistant(String::new()));

        Some(outgoing)
    }

    /// Overwrite the content of whatever message is last right now.
    ///
    /// Replies are matched by position only, so with several requests in
    /// flight the one that resolves last wins the tail.
    pub fn apply_reply(&mut self, content: impl Into<String>) {
        if let Some(last) = self.messages.last_mut() {
            last.content = content.into();
        }
    }

    /// Append the failure notice. The placeholder above it stays empty.
    pub fn apply_failure(&mut self) {
        self.messages.push(Message::assistant(FAILURE_NOTICE));
    }

    /// Fold a completion outcome into the history.
    pub fn resolve<E>(&mut self, outcome: Result<String, E>) {
        match outcome {
            Ok(content) => self.apply_reply(content),
            Err(_) => self.apply_failure(),
        }
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new(GREETING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session_has_only_greeting() {
        let conversation = Conversation::default();
        assert_eq!(conversation.messages(), &[Message::assistant(GREETING)]);
        assert!(conversation
            .messages()
            .iter()
            .all(|m| m.role != Role::User));
    }

    #[test]
    fn test_blank_draft_is_ignored() {
        let mut conversation = Conversation::default();
        for blank in ["", "   ", "\n\t "] {
            let mut draft = blank.to_string();
            assert!(conversation.submit(&mut draft).is_none());
            assert_eq!(conversation.len(), 1);
            // Draft is left alone when nothing was sent
            assert_eq!(draft, blank);
        }
    }

    #[test]
    fn test_submit_appends_user_and_placeholder() {
        let mut conversation = Conversation::default();
        let mut draft = "Hello".to_string();

        let outgoing = conversation.submit(&mut draft).unwrap();

        assert!(draft.is_empty());
        assert_eq!(conversation.len(), 3);
        assert_eq!(conversation.messages()[1], Message::user("Hello"));
        assert_eq!(conversation.messages()[2], Message::assistant(""));
        assert_eq!(
            outgoing,
            vec![Message::assistant(GREETING), Message::user("Hello")]
        );
    }

    #[test]
    fn test_submit_keeps_draft_untrimmed() {
        let mut conversation = Conversation::default();
        let mut draft = "  spaced out  ".to_string();
        let outgoing = conversation.submit(&mut draft).unwrap();
        assert_eq!(outgoing.last().unwrap().content, "  spaced out  ");
    }

    #[test]
    fn test_reply_overwrites_placeholder() {
        let mut conversation = Conversation::default();
        let mut draft = "Hello".to_string();
        conversation.submit(&mut draft);

        conversation.apply_reply("Hi there");

        assert_eq!(conversation.len(), 3);
        assert_eq!(conversation.last(), Some(&Message::assistant("Hi there")));
    }

    #[test]
    fn test_failure_appends_notice_below_placeholder() {
        let mut conversation = Conversation::default();
        let mut draft = "Hello".to_string();
        conversation.submit(&mut draft);

        conversation.resolve::<()>(Err(()));

        assert_eq!(conversation.len(), 4);
        assert_eq!(conversation.messages()[2], Message::assistant(""));
        assert_eq!(conversation.messages()[3], Message::assistant(FAILURE_NOTICE));
    }

    #[test]
    fn test_second_request_includes_earlier_placeholder() {
        let mut conversation = Conversation::default();
        let mut draft = "first".to_string();
        conversation.submit(&mut draft);
        draft.push_str("second");

        let outgoing = conversation.submit(&mut draft).unwrap();

        assert_eq!(
            outgoing,
            vec![
                Message::assistant(GREETING),
                Message::user("first"),
                Message::assistant(""),
                Message::user("second"),
            ]
        );
    }

    #[test]
    fn test_overlapping_replies_neither_lose_nor_duplicate() {
        let mut conversation = Conversation::default();
        let mut draft = "one".to_string();
        conversation.submit(&mut draft);
        draft.push_str("two");
        conversation.submit(&mut draft);
        assert_eq!(conversation.len(), 5);

        conversation.resolve::<()>(Ok("reply two".to_string()));
        conversation.resolve::<()>(Ok("reply one".to_string()));

        assert_eq!(conversation.len(), 5);
        let users: Vec<_> = conversation
            .messages()
            .iter()
            .filter(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(users, vec!["one", "two"]);
        // Last resolution owns the tail
        assert_eq!(conversation.last().unwrap().content, "reply one");
    }

    #[test]
    fn test_reply_after_failure_overwrites_notice() {
        let mut conversation = Conversation::default();
        let mut draft = "one".to_string();
        conversation.submit(&mut draft);
        draft.push_str("two");
        conversation.submit(&mut draft);

        conversation.apply_failure();
        conversation.apply_reply("late");

        assert_eq!(conversation.len(), 6);
        assert_eq!(conversation.last(), Some(&Message::assistant("late")));
    }

    #[test]
    fn test_role_wire_format() {
        let json = serde_json::to_string(&Message::user("hey")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hey"}"#);
        let parsed: Message =
            serde_json::from_str(r#"{"role":"assistant","content":"yo"}"#).unwrap();
        assert_eq!(parsed, Message::assistant("yo"));
    }
}
