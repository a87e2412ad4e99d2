//! The bot runtime: one gateway shard feeding the dispatcher.
//!
//! The event loop itself stays small. READY registers the slash commands
//! (once per process), INTERACTION_CREATE is converted and handed to a
//! spawned task so a slow handler never holds up the gateway. Everything
//! else the shard receives is ignored.

use std::sync::Arc;

use tracing::{debug, info, warn};
use twilight_gateway::{Event, EventTypeFlags, Intents, Shard, ShardId, StreamExt as _};
use twilight_http::Client;
use twilight_model::application::interaction::Interaction;
use twilight_model::gateway::payload::incoming::Ready;
use twilight_model::id::marker::ApplicationMarker;
use twilight_model::id::Id;

use crate::commands;
use crate::config::BotConfig;
use crate::dispatch::Dispatcher;
use crate::error::BotError;
use crate::platform::{self, InteractionResponder};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Identity and lifecycle state, owned by the event loop.
#[derive(Debug, Default)]
pub struct BotState {
    /// The application ID (set on READY).
    pub application_id: Option<Id<ApplicationMarker>>,
    /// Whether slash commands have been registered this session.
    pub commands_registered: bool,
}

impl BotState {
    /// Record the identity from READY and report whether commands still
    /// need registering. Resumed sessions can deliver READY again.
    pub fn on_ready(&mut self, application_id: Id<ApplicationMarker>) -> bool {
        self.application_id = Some(application_id);
        !self.commands_registered
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Interactions arrive without any privileged intents.
fn gateway_intents() -> Intents {
    Intents::empty()
}

fn wanted_events() -> EventTypeFlags {
    EventTypeFlags::READY | EventTypeFlags::INTERACTION_CREATE
}

/// Build the command table, connect to the gateway, and run until the
/// shard's event stream ends.
pub async fn start(config: BotConfig) -> Result<(), BotError> {
    let dispatcher = Arc::new(commands::dispatcher()?);
    info!(
        commands = dispatcher.commands().len(),
        "command table built"
    );

    let http = Arc::new(Client::new(config.token.clone()));
    let mut shard = Shard::new(ShardId::ONE, config.token.clone(), gateway_intents());
    let mut state = BotState::default();

    info!("connecting to gateway");

    // ----- Main event loop -----
    while let Some(item) = shard.next_event(wanted_events()).await {
        let event = match item {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "error receiving gateway event");
                continue;
            }
        };

        match event {
            Event::Ready(ready) => {
                on_ready(&mut state, &http, &dispatcher, &config, &ready).await;
            }

            Event::InteractionCreate(create) => {
                on_interaction(&http, &dispatcher, create.0);
            }

            _ => {}
        }
    }

    warn!("event stream ended, bot shutting down");
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn on_ready(
    state: &mut BotState,
    http: &Client,
    dispatcher: &Dispatcher,
    config: &BotConfig,
    ready: &Ready,
) {
    info!(user = %ready.user.name, guilds = ready.guilds.len(), "bot is ready!");

    let app_id = ready.application.id;
    if !state.on_ready(app_id) {
        return;
    }

    let commands: Vec<_> = dispatcher
        .commands()
        .snapshot()
        .iter()
        .map(platform::application_command)
        .collect();

    let client = http.interaction(app_id);
    let result = match config.dev_guild_id {
        Some(guild_id) => client.set_guild_commands(guild_id, &commands).await,
        None => client.set_global_commands(&commands).await,
    };

    match result {
        Ok(_) => {
            info!(
                count = commands.len(),
                guild = ?config.dev_guild_id,
                "registered slash commands"
            );
            state.commands_registered = true;
        }
        Err(e) => {
            // The bot keeps running; previously registered commands still work.
            warn!(error = %e, "failed to register slash commands");
        }
    }
}

fn on_interaction(http: &Arc<Client>, dispatcher: &Arc<Dispatcher>, interaction: Interaction) {
    let Some(event) = platform::interaction_event(&interaction) else {
        debug!(kind = ?interaction.kind, "ignoring interaction");
        return;
    };

    let responder = Arc::new(InteractionResponder::new(
        Arc::clone(http),
        interaction.application_id,
        interaction.id,
        interaction.token,
    ));
    let dispatcher = Arc::clone(dispatcher);

    tokio::spawn(async move {
        dispatcher.dispatch(event, responder).await;
    });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bot_state_default_has_no_identity() {
        let state = BotState::default();
        assert!(state.application_id.is_none());
        assert!(!state.commands_registered);
    }

    #[test]
    fn first_ready_requests_registration() {
        let mut state = BotState::default();
        assert!(state.on_ready(Id::new(67890)));
        assert_eq!(state.application_id, Some(Id::new(67890)));
    }

    #[test]
    fn ready_after_registration_is_a_no_op() {
        let mut state = BotState::default();
        state.on_ready(Id::new(1));
        state.commands_registered = true;
        assert!(!state.on_ready(Id::new(1)));
    }

    #[test]
    fn failed_registration_is_retried_on_next_ready() {
        let mut state = BotState::default();
        assert!(state.on_ready(Id::new(1)));
        // Registration failed, flag untouched.
        assert!(state.on_ready(Id::new(1)));
    }

    #[test]
    fn event_filter_covers_ready_and_interactions() {
        let flags = wanted_events();
        assert!(flags.contains(EventTypeFlags::READY));
        assert!(flags.contains(EventTypeFlags::INTERACTION_CREATE));
        assert!(!flags.contains(EventTypeFlags::MESSAGE_CREATE));
    }

    #[test]
    fn no_privileged_intents() {
        let intents = gateway_intents();
        assert!(!intents.contains(Intents::MESSAGE_CONTENT));
        assert!(!intents.contains(Intents::GUILD_PRESENCES));
        assert!(!intents.contains(Intents::GUILD_MEMBERS));
    }
}
