//! Routes interactions to their handlers.
//!
//! Each inbound interaction gets its own [`InteractionContext`] and runs
//! through a tiny idle → dispatching → idle lifecycle. Nothing in here is
//! shared mutably between interactions, so any number of dispatches may be
//! in flight at once.
//!
//! Failures never escape: unknown targets get a generic acknowledgement.
//! Handler errors and panics are logged and answered with a best-effort
//! fallback when the handler had not acknowledged yet.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_lite::FutureExt as _;
use tracing::{debug, error, warn};

use crate::command::Command;
use crate::error::{HandlerResult, RegistryError};
use crate::interaction::{InteractionEvent, InteractionKind};
use crate::registry::{ComponentHandler, ComponentRegistry, Registry};
use crate::response::{InteractionContext, MessageReply, Responder};

/// Sent when no handler matches the interaction.
pub const UNKNOWN_INTERACTION: &str = "Unknown interaction.";

/// Sent when a handler fails before acknowledging.
pub const HANDLER_FAILED: &str = "Something went wrong while handling that interaction.";

/// How a dispatch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The handler ran and acknowledged the interaction.
    Handled,
    /// No handler matched; the generic acknowledgement was attempted.
    Unknown,
    /// The handler errored, panicked, or never acknowledged.
    Failed,
}

enum Target<'a> {
    Command(&'a Arc<dyn Command>),
    Component(&'a Arc<dyn ComponentHandler>),
}

/// Commands, buttons, and modal handlers, resolved per interaction.
#[derive(Debug, Default)]
pub struct Dispatcher {
    commands: Registry,
    components: ComponentRegistry,
    modals: ComponentRegistry,
}

impl Dispatcher {
    pub fn new(commands: Registry, components: ComponentRegistry, modals: ComponentRegistry) -> Self {
        Self {
            commands,
            components,
            modals,
        }
    }

    /// The slash commands, e.g. for bulk registration.
    pub fn commands(&self) -> &Registry {
        &self.commands
    }

    fn resolve(&self, interaction: &InteractionEvent) -> Result<Target<'_>, RegistryError> {
        match interaction.kind {
            InteractionKind::Command => self.commands.resolve(&interaction.target).map(Target::Command),
            InteractionKind::Component => self
                .components
                .resolve(&interaction.target)
                .map(Target::Component),
            InteractionKind::ModalSubmit => {
                self.modals.resolve(&interaction.target).map(Target::Component)
            }
        }
    }

    /// Route one interaction to its handler and answer it through `responder`.
    pub async fn dispatch(
        &self,
        interaction: InteractionEvent,
        responder: Arc<dyn Responder>,
    ) -> DispatchOutcome {
        let kind = interaction.kind;
        let target_name = interaction.target.clone();
        let ctx = InteractionContext::new(interaction, responder);

        debug!(kind = %kind, target = %target_name, "interaction received, idle");

        let target = match self.resolve(ctx.interaction()) {
            Ok(target) => target,
            Err(e) => {
                warn!(kind = %kind, target = %target_name, error = %e, "no handler for interaction");
                if let Err(e) = ctx.respond(MessageReply::ephemeral(UNKNOWN_INTERACTION)).await {
                    warn!(error = %e, "failed to acknowledge unknown interaction");
                }
                return DispatchOutcome::Unknown;
            }
        };

        debug!(kind = %kind, target = %target_name, "dispatching to handler");

        let run = async {
            match target {
                Target::Command(command) => command.execute(&ctx).await,
                Target::Component(handler) => handler.execute(&ctx).await,
            }
        };
        let result: Result<HandlerResult, Box<dyn Any + Send>> =
            AssertUnwindSafe(run).catch_unwind().await;

        let outcome = match result {
            Ok(Ok(())) if ctx.is_acknowledged() => DispatchOutcome::Handled,
            Ok(Ok(())) => {
                warn!(kind = %kind, target = %target_name, "handler finished without acknowledging");
                fallback(&ctx).await;
                DispatchOutcome::Failed
            }
            Ok(Err(e)) => {
                error!(kind = %kind, target = %target_name, error = %e, "handler failed");
                if !ctx.is_acknowledged() {
                    fallback(&ctx).await;
                }
                DispatchOutcome::Failed
            }
            Err(panic) => {
                error!(
                    kind = %kind,
                    target = %target_name,
                    panic = panic_message(panic.as_ref()),
                    "handler panicked"
                );
                if !ctx.is_acknowledged() {
                    fallback(&ctx).await;
                }
                DispatchOutcome::Failed
            }
        };

        debug!(kind = %kind, target = %target_name, ?outcome, "interaction finished, idle");
        outcome
    }
}

/// Best effort: the platform's response deadline may already have passed.
async fn fallback(ctx: &InteractionContext) {
    if let Err(e) = ctx.respond(MessageReply::ephemeral(HANDLER_FAILED)).await {
        warn!(error = %e, "fallback acknowledgement failed");
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string panic>")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
