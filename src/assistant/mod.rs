//! The templated chat assistant.

pub mod history;
pub mod templates;

pub use history::{ChatEntry, ChatHistory};
pub use templates::{classify, matched_keywords, render, render_tag, respond, Intent};
