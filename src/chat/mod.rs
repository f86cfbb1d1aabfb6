//! Chat-facing surface: typed replies in, typed prompts out.
//!
//! The transport itself (network protocol, keyboards, formatting) lives
//! outside this crate and only has to implement [`PromptSink`] and feed
//! [`UserReply`] values into a [`ChatSession`].

pub mod commands;
pub mod message;
pub mod session;

pub use message::{
    ImageAttachment, PhotoVariant, Prompt, PromptSink, RecordingSink, ReplyContent, UserReply,
};
pub use session::ChatSession;
