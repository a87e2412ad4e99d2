//! Runtime configuration, read from the environment (and `.env`, if present).

use twilight_model::id::marker::GuildMarker;
use twilight_model::id::Id;

use crate::error::ConfigError;

const TOKEN_VAR: &str = "DISCORD_TOKEN";
const DEV_GUILD_VAR: &str = "DISCORD_DEV_GUILD_ID";

/// Everything the bot needs to connect.
#[derive(Clone)]
pub struct BotConfig {
    /// Bot token used for both the gateway and REST.
    pub token: String,
    /// Register commands to this guild only. Guild commands update
    /// instantly, global ones can take up to an hour.
    pub dev_guild_id: Option<Id<GuildMarker>>,
}

impl BotConfig {
    /// Load `.env` into the process environment, then read the bot's variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_vars(
            std::env::var(TOKEN_VAR).ok(),
            std::env::var(DEV_GUILD_VAR).ok(),
        )
    }

    /// Build a config from raw variable values. Blank values count as unset.
    pub fn from_vars(token: Option<String>, dev_guild: Option<String>) -> Result<Self, ConfigError> {
        let token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let dev_guild_id = match dev_guild.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<u64>()
                    .ok()
                    .and_then(Id::new_checked)
                    .ok_or_else(|| ConfigError::InvalidGuildId(raw.to_string()))?,
            ),
        };

        Ok(Self {
            token,
            dev_guild_id,
        })
    }
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<redacted>")
            .field("dev_guild_id", &self.dev_guild_id)
            .finish()
    }
}
