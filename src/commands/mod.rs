//! The bot's commands and component handlers.
//!
//! [`dispatcher`] builds the complete routing table. It is called once at
//! startup; a duplicate or invalid entry is a bug in this file and aborts the
//! bot before it connects.

pub mod make_move;
pub mod ping;
pub mod play;
pub mod square;

use std::sync::Arc;

use crate::dispatch::Dispatcher;
use crate::error::RegistryError;
use crate::registry::{ComponentRegistry, Registry};

/// Build the dispatcher with every command, button, and modal handler.
pub fn dispatcher() -> Result<Dispatcher, RegistryError> {
    let mut commands = Registry::new();
    commands.register(Arc::new(ping::Ping))?;
    commands.register(Arc::new(play::Play))?;

    let mut components = ComponentRegistry::new();
    components.register(Arc::new(make_move::MakeMoveButton))?;

    let mut modals = ComponentRegistry::new();
    modals.register(Arc::new(make_move::MoveSubmission))?;

    Ok(Dispatcher::new(commands, components, modals))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
