//! Typed messages exchanged with the chat transport.

use anyhow::Result;

use crate::profiles::{PhotoRef, UserId};

/// One size of an uploaded photo. Platforms usually deliver several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoVariant {
    pub photo_ref: PhotoRef,
    pub width: u32,
    pub height: u32,
    pub file_size: Option<u64>,
}

impl PhotoVariant {
    pub fn new(photo_ref: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            photo_ref: PhotoRef::new(photo_ref),
            width,
            height,
            file_size: None,
        }
    }

    pub fn pixels(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyContent {
    Text(String),
    Photo(Vec<PhotoVariant>),
}

/// Inbound event from one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserReply {
    pub user_id: UserId,
    pub content: ReplyContent,
}

impl UserReply {
    pub fn text(user_id: impl Into<UserId>, text: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            content: ReplyContent::Text(text.into()),
        }
    }

    pub fn photo(user_id: impl Into<UserId>, variants: Vec<PhotoVariant>) -> Self {
        Self {
            user_id: user_id.into(),
            content: ReplyContent::Photo(variants),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub photo_ref: PhotoRef,
    pub caption: String,
}

/// Outbound message. An empty `quick_replies` list tells the transport to
/// clear any previously offered options.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Prompt {
    pub text: String,
    pub quick_replies: Vec<String>,
    pub image: Option<ImageAttachment>,
}

impl Prompt {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn image(photo_ref: PhotoRef, caption: impl Into<String>) -> Self {
        Self {
            image: Some(ImageAttachment {
                photo_ref,
                caption: caption.into(),
            }),
            ..Self::default()
        }
    }

    pub fn with_quick_replies<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.quick_replies = options.into_iter().map(Into::into).collect();
        self
    }
}

/// Capability to deliver prompts to the user.
pub trait PromptSink {
    fn emit(&mut self, prompt: Prompt) -> Result<()>;
}

/// Collects prompts in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub prompts: Vec<Prompt>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns and clears everything recorded so far.
    pub fn take(&mut self) -> Vec<Prompt> {
        std::mem::take(&mut self.prompts)
    }

    pub fn last(&self) -> Option<&Prompt> {
        self.prompts.last()
    }
}

impl PromptSink for RecordingSink {
    fn emit(&mut self, prompt: Prompt) -> Result<()> {
        self.prompts.push(prompt);
        Ok(())
    }
}
