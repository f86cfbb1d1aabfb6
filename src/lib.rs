pub mod chat;
pub mod config;
pub mod form;
pub mod logging;
pub mod profiles;

// Re-export commonly used types for convenience.
pub use chat::{ChatSession, Prompt, PromptSink, ReplyContent, UserReply};
pub use config::AppConfig;
pub use form::{FormState, FormStateMachine, ProfileAssembler};
pub use profiles::{Profile, ProfileStore, UserId};
