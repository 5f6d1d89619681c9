// nevin library - ai relay service and bible dataset builder

pub mod cli;
mod core;
mod error;
mod server;

pub use core::{BuildSummary, Builder, ChatMessage, Claude, Profile};
pub use core::{chat_messages, commentary_prompt, moment_title_prompt};
pub use error::Error;
pub use server::Server;
