use crate::completion::{CompletionClient, CompletionError};
use crate::config::Config;
use crate::conversation::Conversation;
use crate::theme::Theme;
use crate::tui::{AppEvent, EventSender};

pub struct App {
    // Core state
    pub should_quit: bool,

    // Transcript
    pub conversation: Conversation,
    /// Requests sent but not yet resolved. Nothing stops this exceeding one.
    pub pending: usize,

    // Draft input
    pub draft: String,
    pub cursor: usize, // char position in draft

    // Transcript viewport (updated during render)
    pub scroll: u16,
    pub follow_tail: bool,
    pub chat_height: u16,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    pub theme: Theme,
    client: CompletionClient,
    events: EventSender,
}

impl App {
    pub fn new(config: &Config, events: EventSender) -> Self {
        Self {
            should_quit: false,
            conversation: Conversation::new(config.greeting.clone()),
            pending: 0,
            draft: String::new(),
            cursor: 0,
            scroll: 0,
            follow_tail: true,
            chat_height: 0,
            animation_frame: 0,
            theme: config.theme.clone(),
            client: CompletionClient::new(&config.chat_url()),
            events,
        }
    }

    /// Send the draft. Blank drafts are ignored without a request.
    ///
    /// Returns immediately; the reply comes back later as
    /// [`AppEvent::Completion`] on the event channel.
    pub fn submit(&mut self) {
        let Some(outgoing) = self.conversation.submit(&mut self.draft) else {
            return;
        };
        self.cursor = 0;
        self.pending += 1;
        self.follow_tail = true;

        tracing::debug!(
            messages = outgoing.len(),
            pending = self.pending,
            url = self.client.url(),
            "sending conversation"
        );

        let client = self.client.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = client.complete(&outgoing).await;
            // Run loop has gone away; nothing left to update
            let _ = events.send(AppEvent::Completion(outcome));
        });
    }

    /// Apply a completion outcome to the transcript
    pub fn on_completion(&mut self, outcome: Result<String, CompletionError>) {
        self.pending = self.pending.saturating_sub(1);
        match &outcome {
            Ok(content) => tracing::debug!(chars = content.chars().count(), "reply received"),
            Err(e) => tracing::error!("error fetching chat response: {}", e),
        }
        self.conversation.resolve(outcome);
        self.follow_tail = true;
    }

    pub fn is_waiting(&self) -> bool {
        self.pending > 0
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_waiting() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.follow_tail = false;
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Scrolling past the end is clamped by the renderer, which also
    /// re-enables tail following once the bottom is reached.
    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    pub fn page_size(&self) -> u16 {
        self.chat_height.max(1)
    }
}
