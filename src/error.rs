//! Error types for registration, dispatch, and replies.
//!
//! Registration errors are fatal at startup. Everything raised while an
//! interaction is being handled is logged by the dispatcher and never takes
//! the process down.

use thiserror::Error;

/// Boxed error returned by command and component handlers.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Result returned by command and component handlers.
pub type HandlerResult = std::result::Result<(), HandlerError>;

/// Reasons a [`CommandDescriptor`](crate::command::CommandDescriptor) is
/// rejected before it reaches Discord.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("name must be 1-32 characters, got {0}")]
    NameLength(usize),

    #[error("name '{0}' may only contain lowercase letters, digits, '-' and '_'")]
    NameCharset(String),

    #[error("description must be 1-100 characters, got {0}")]
    DescriptionLength(usize),

    #[error("at most 25 options are allowed, got {0}")]
    TooManyOptions(usize),

    #[error("option '{name}' is invalid: {source}")]
    InvalidOption {
        name: String,
        #[source]
        source: Box<DescriptorError>,
    },

    #[error("option name '{0}' is used more than once")]
    DuplicateOption(String),

    #[error("required option '{0}' must come before all optional options")]
    RequiredAfterOptional(String),
}

/// Errors raised by [`Registry`](crate::registry::Registry) and
/// [`ComponentRegistry`](crate::registry::ComponentRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A handler with this name or customID is already registered.
    #[error("'{0}' is already registered")]
    DuplicateName(String),

    /// The command's descriptor would be rejected by the platform.
    #[error("command '{name}' has an invalid descriptor: {source}")]
    InvalidDescriptor {
        name: String,
        #[source]
        source: DescriptorError,
    },

    /// Component handlers must answer a non-empty customID.
    #[error("component handler has an empty customID")]
    EmptyCustomId,

    /// The platform rejects customIDs longer than 100 characters.
    #[error("customID '{0}' is longer than 100 characters")]
    CustomIdTooLong(String),

    /// Nothing is registered under this name or customID.
    #[error("nothing registered under '{0}'")]
    NotFound(String),
}

/// Errors raised when acknowledging an interaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseError {
    /// The interaction already received its one response.
    #[error("interaction has already been acknowledged")]
    AlreadyAcknowledged,

    /// The platform client failed to deliver the response.
    #[error("platform transport error: {0}")]
    Transport(String),
}

/// Errors raised while loading [`BotConfig`](crate::config::BotConfig).
#[cfg(feature = "io")]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("DISCORD_TOKEN environment variable not set")]
    MissingToken,

    #[error("DISCORD_DEV_GUILD_ID '{0}' is not a valid snowflake")]
    InvalidGuildId(String),
}

/// Fatal errors that stop the bot from starting.
#[cfg(feature = "io")]
#[derive(Debug, Error)]
pub enum BotError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("command table is invalid: {0}")]
    Registry(#[from] RegistryError),
}
