// core logic - anthropic relay, prompt assembly, and the dataset builder

mod ai;
mod builder;
mod prompts;

pub use ai::{ChatMessage, Claude};
pub use builder::{BuildSummary, Builder, OUTPUT_DIR, PROMISES_CSV, VERSES_CSV};
pub use prompts::{Profile, chat_messages, commentary_prompt, moment_title_prompt};
