pub mod app;
pub mod completion;
pub mod config;
pub mod conversation;
pub mod handler;
pub mod theme;
pub mod tui;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use completion::{CompletionClient, CompletionError};
pub use config::Config;
pub use conversation::{Conversation, Message, Role};
pub use theme::Theme;
