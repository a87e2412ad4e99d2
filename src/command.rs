//! Slash-command definitions.
//!
//! A [`Command`] pairs a static [`CommandDescriptor`] (what Discord shows in
//! the command picker) with an async `execute` that answers the interaction.
//! Descriptors serialize to the same shape the bulk-registration endpoint
//! expects, and are validated against Discord's limits before registration.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::error::{DescriptorError, HandlerResult};
use crate::response::InteractionContext;

const MAX_NAME_LEN: usize = 32;
const MAX_DESCRIPTION_LEN: usize = 100;
const MAX_OPTIONS: usize = 25;

// ---------------------------------------------------------------------------
// Option types
// ---------------------------------------------------------------------------

/// The value type of a command option, serialized as Discord's integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum OptionType {
    String = 3,
    Integer = 4,
    Boolean = 5,
    User = 6,
    Channel = 7,
    Role = 8,
    Mentionable = 9,
    Number = 10,
    Attachment = 11,
}

/// One typed option of a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: OptionType,
    #[serde(default)]
    pub required: bool,
}

impl OptionSpec {
    /// An optional option; chain [`required`](Self::required) to change that.
    pub fn new(kind: OptionType, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: false,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

// ---------------------------------------------------------------------------
// Descriptor
// ---------------------------------------------------------------------------

/// The serializable `{name, description, options}` view of a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub options: Vec<OptionSpec>,
}

impl CommandDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
        }
    }

    /// Append an option. Order is preserved in the registration payload.
    pub fn option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    /// Check the descriptor against Discord's chat-input command limits.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        validate_name(&self.name)?;
        validate_description(&self.description)?;

        if self.options.len() > MAX_OPTIONS {
            return Err(DescriptorError::TooManyOptions(self.options.len()));
        }

        let mut seen = HashSet::new();
        let mut saw_optional = false;
        for option in &self.options {
            validate_name(&option.name)
                .and_then(|_| validate_description(&option.description))
                .map_err(|source| DescriptorError::InvalidOption {
                    name: option.name.clone(),
                    source: Box::new(source),
                })?;

            if !seen.insert(option.name.as_str()) {
                return Err(DescriptorError::DuplicateOption(option.name.clone()));
            }

            if option.required && saw_optional {
                return Err(DescriptorError::RequiredAfterOptional(option.name.clone()));
            }
            saw_optional |= !option.required;
        }

        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), DescriptorError> {
    let len = name.chars().count();
    if len == 0 || len > MAX_NAME_LEN {
        return Err(DescriptorError::NameLength(len));
    }
    let valid = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if !valid {
        return Err(DescriptorError::NameCharset(name.to_string()));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), DescriptorError> {
    let len = description.chars().count();
    if len == 0 || len > MAX_DESCRIPTION_LEN {
        return Err(DescriptorError::DescriptionLength(len));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Command trait
// ---------------------------------------------------------------------------

/// A user-invocable slash command.
///
/// Implementations must acknowledge the interaction exactly once through the
/// context, either with [`InteractionContext::respond`] or
/// [`InteractionContext::show_modal`]. Bad user input should be answered
/// with a reply, not an error; errors are reserved for platform failures.
#[async_trait]
pub trait Command: Send + Sync {
    /// The registration view of this command. Must be pure.
    fn descriptor(&self) -> CommandDescriptor;

    /// Answer one invocation of this command.
    async fn execute(&self, ctx: &InteractionContext) -> HandlerResult;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
