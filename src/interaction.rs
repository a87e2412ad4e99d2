//! Platform-neutral view of an inbound interaction.
//!
//! The platform adapter flattens twilight's `Interaction` into an
//! [`InteractionEvent`] so handlers and tests never touch raw gateway models.

use std::collections::BTreeMap;

/// What the user did to trigger the interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    /// A slash command was invoked.
    Command,
    /// A message component (button, select menu) was used.
    Component,
    /// A modal form was submitted.
    ModalSubmit,
}

impl std::fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            InteractionKind::Command => "command",
            InteractionKind::Component => "component",
            InteractionKind::ModalSubmit => "modal-submit",
        };
        f.write_str(name)
    }
}

/// A single inbound interaction, read-only to handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionEvent {
    pub kind: InteractionKind,
    /// Command name, or the customID of the component / modal.
    pub target: String,
    /// The invoking user's snowflake, when the platform supplied one.
    pub user_id: Option<u64>,
    /// Command option values or submitted modal fields, keyed by name / customID.
    pub fields: BTreeMap<String, String>,
    /// Values picked in a select menu.
    pub values: Vec<String>,
}

impl InteractionEvent {
    pub fn new(kind: InteractionKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
            user_id: None,
            fields: BTreeMap::new(),
            values: Vec::new(),
        }
    }

    pub fn command(name: impl Into<String>) -> Self {
        Self::new(InteractionKind::Command, name)
    }

    pub fn component(custom_id: impl Into<String>) -> Self {
        Self::new(InteractionKind::Component, custom_id)
    }

    pub fn modal_submit(custom_id: impl Into<String>) -> Self {
        Self::new(InteractionKind::ModalSubmit, custom_id)
    }

    pub fn with_user(mut self, user_id: u64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_values(mut self, values: Vec<String>) -> Self {
        self.values = values;
        self
    }

    /// Look up an option value or submitted field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// The argument carried after `:` in a customID such as `makeMove:42`.
    pub fn target_argument(&self) -> Option<&str> {
        self.target.split_once(':').map(|(_, arg)| arg)
    }

    /// A Discord mention for the invoking user, if known.
    pub fn user_mention(&self) -> Option<String> {
        self.user_id.map(|id| format!("<@{}>", id))
    }
}
