//! Replies and the per-interaction response context.
//!
//! Discord accepts exactly one initial response per interaction. The
//! [`InteractionContext`] enforces that locally: the first acknowledgement is
//! forwarded to the [`Responder`], every later one fails with
//! [`ResponseError::AlreadyAcknowledged`] without touching the network.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::ResponseError;
use crate::interaction::InteractionEvent;

// ---------------------------------------------------------------------------
// Reply payloads
// ---------------------------------------------------------------------------

/// A primary-style button attached to a message reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonSpec {
    pub custom_id: String,
    pub label: String,
}

impl ButtonSpec {
    pub fn new(custom_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            custom_id: custom_id.into(),
            label: label.into(),
        }
    }
}

/// A message sent in reply to an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageReply {
    pub content: String,
    /// Only the invoking user can see the reply.
    pub ephemeral: bool,
    /// Rendered as a single action row under the message.
    pub buttons: Vec<ButtonSpec>,
}

impl MessageReply {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: false,
            buttons: Vec::new(),
        }
    }

    /// A reply only the invoking user can see.
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            ephemeral: true,
            ..Self::new(content)
        }
    }

    pub fn button(mut self, button: ButtonSpec) -> Self {
        self.buttons.push(button);
        self
    }
}

impl From<&str> for MessageReply {
    fn from(content: &str) -> Self {
        Self::new(content)
    }
}

impl From<String> for MessageReply {
    fn from(content: String) -> Self {
        Self::new(content)
    }
}

/// Single-line or multi-line text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextFieldStyle {
    #[default]
    Short,
    Paragraph,
}

/// A labelled text input inside a modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    pub custom_id: String,
    pub label: String,
    pub style: TextFieldStyle,
    pub placeholder: Option<String>,
    pub required: bool,
}

impl TextField {
    /// A required single-line field.
    pub fn short(custom_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            custom_id: custom_id.into(),
            label: label.into(),
            style: TextFieldStyle::Short,
            placeholder: None,
            required: true,
        }
    }

    /// A required multi-line field.
    pub fn paragraph(custom_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            style: TextFieldStyle::Paragraph,
            ..Self::short(custom_id, label)
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// A pop-up form. Each row holds the fields rendered side by side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalForm {
    pub title: String,
    pub custom_id: String,
    pub rows: Vec<Vec<TextField>>,
}

impl ModalForm {
    pub fn new(custom_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            custom_id: custom_id.into(),
            rows: Vec::new(),
        }
    }

    /// Append a row holding a single field.
    pub fn field(mut self, field: TextField) -> Self {
        self.rows.push(vec![field]);
        self
    }

    /// Iterate every field in row order.
    pub fn fields(&self) -> impl Iterator<Item = &TextField> {
        self.rows.iter().flatten()
    }
}

/// The acknowledgement sent back for an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Message(MessageReply),
    Modal(ModalForm),
}

// ---------------------------------------------------------------------------
// Transport seam
// ---------------------------------------------------------------------------

/// Delivers the acknowledgement for one specific interaction.
///
/// Implemented over `twilight-http` in the bot runtime and by a recording
/// double in tests.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn send(&self, reply: Reply) -> Result<(), ResponseError>;
}

// ---------------------------------------------------------------------------
// InteractionContext
// ---------------------------------------------------------------------------

/// Everything a handler gets for one interaction: the event it is answering
/// and the once-only means of answering it.
pub struct InteractionContext {
    interaction: InteractionEvent,
    responder: Arc<dyn Responder>,
    acknowledged: AtomicBool,
}

impl InteractionContext {
    pub fn new(interaction: InteractionEvent, responder: Arc<dyn Responder>) -> Self {
        Self {
            interaction,
            responder,
            acknowledged: AtomicBool::new(false),
        }
    }

    /// The interaction this context answers.
    pub fn interaction(&self) -> &InteractionEvent {
        &self.interaction
    }

    /// Whether a response has been delivered.
    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged.load(Ordering::SeqCst)
    }

    /// Reply with a message.
    pub async fn respond(&self, reply: impl Into<MessageReply>) -> Result<(), ResponseError> {
        self.acknowledge(Reply::Message(reply.into())).await
    }

    /// Open a modal form.
    pub async fn show_modal(&self, form: ModalForm) -> Result<(), ResponseError> {
        self.acknowledge(Reply::Modal(form)).await
    }

    async fn acknowledge(&self, reply: Reply) -> Result<(), ResponseError> {
        if self.acknowledged.swap(true, Ordering::SeqCst) {
            debug!(
                target = %self.interaction.target,
                "rejecting second acknowledgement"
            );
            return Err(ResponseError::AlreadyAcknowledged);
        }

        if let Err(e) = self.responder.send(reply).await {
            // Nothing was delivered, so a fallback may still be attempted.
            self.acknowledged.store(false, Ordering::SeqCst);
            return Err(e);
        }
        Ok(())
    }
}

impl std::fmt::Debug for InteractionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionContext")
            .field("interaction", &self.interaction)
            .field("acknowledged", &self.is_acknowledged())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
