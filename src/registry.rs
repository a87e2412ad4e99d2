//! Lookup tables from command names and customIDs to handlers.
//!
//! Both tables are filled once at startup and only read afterwards, so they
//! are shared across dispatch tasks behind an `Arc` without any locking.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::command::{Command, CommandDescriptor};
use crate::error::{HandlerResult, RegistryError};
use crate::response::InteractionContext;

// ---------------------------------------------------------------------------
// Command registry
// ---------------------------------------------------------------------------

struct Entry {
    descriptor: CommandDescriptor,
    command: Arc<dyn Command>,
}

/// Slash commands keyed by name, in registration order.
#[derive(Default)]
pub struct Registry {
    entries: Vec<Entry>,
    by_name: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command.
    ///
    /// Fails with [`RegistryError::DuplicateName`] when the name is taken, in
    /// which case the registry is left untouched and the first command kept.
    pub fn register(&mut self, command: Arc<dyn Command>) -> Result<(), RegistryError> {
        let descriptor = command.descriptor();
        descriptor
            .validate()
            .map_err(|source| RegistryError::InvalidDescriptor {
                name: descriptor.name.clone(),
                source,
            })?;

        if self.by_name.contains_key(&descriptor.name) {
            return Err(RegistryError::DuplicateName(descriptor.name));
        }

        debug!(command = %descriptor.name, options = descriptor.options.len(), "registered command");
        self.by_name
            .insert(descriptor.name.clone(), self.entries.len());
        self.entries.push(Entry {
            descriptor,
            command,
        });
        Ok(())
    }

    /// Find the command registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<&Arc<dyn Command>, RegistryError> {
        self.by_name
            .get(name)
            .map(|&index| &self.entries[index].command)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// Descriptors of every command, in registration order, for bulk upload.
    pub fn snapshot(&self) -> Vec<CommandDescriptor> {
        self.entries.iter().map(|e| e.descriptor.clone()).collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.descriptor.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

// ---------------------------------------------------------------------------
// Component registry
// ---------------------------------------------------------------------------

/// Longest customID the platform accepts, in characters.
pub const MAX_CUSTOM_ID_LEN: usize = 100;

fn check_custom_id_len(custom_id: &str) -> Result<(), RegistryError> {
    if custom_id.chars().count() > MAX_CUSTOM_ID_LEN {
        return Err(RegistryError::CustomIdTooLong(custom_id.to_string()));
    }
    Ok(())
}

/// Build `base:argument`, or just `base` without an argument, for a
/// component routed to the handler registered under `base`.
pub fn keyed_custom_id(base: &str, argument: Option<&str>) -> Result<String, RegistryError> {
    let custom_id = match argument {
        Some(argument) => format!("{}:{}", base, argument),
        None => base.to_string(),
    };
    check_custom_id_len(&custom_id)?;
    Ok(custom_id)
}

/// Handles a button press or a modal submission routed by customID.
#[async_trait]
pub trait ComponentHandler: Send + Sync {
    /// The customID this handler answers. Interactions whose customID carries
    /// an argument (`makeMove:42`) are routed by the part before the colon.
    fn custom_id(&self) -> &str;

    /// Answer one interaction. Must acknowledge exactly once.
    async fn execute(&self, ctx: &InteractionContext) -> HandlerResult;
}

/// Component or modal handlers keyed by customID.
#[derive(Default)]
pub struct ComponentRegistry {
    handlers: HashMap<String, Arc<dyn ComponentHandler>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn ComponentHandler>) -> Result<(), RegistryError> {
        let custom_id = handler.custom_id().to_string();
        if custom_id.is_empty() {
            return Err(RegistryError::EmptyCustomId);
        }
        check_custom_id_len(&custom_id)?;
        if self.handlers.contains_key(&custom_id) {
            return Err(RegistryError::DuplicateName(custom_id));
        }
        debug!(custom_id = %custom_id, "registered component handler");
        self.handlers.insert(custom_id, handler);
        Ok(())
    }

    /// Find the handler for `custom_id`: exact match first, then the part
    /// before the first `:`.
    pub fn resolve(&self, custom_id: &str) -> Result<&Arc<dyn ComponentHandler>, RegistryError> {
        self.handlers
            .get(custom_id)
            .or_else(|| {
                custom_id
                    .split_once(':')
                    .and_then(|(prefix, _)| self.handlers.get(prefix))
            })
            .ok_or_else(|| RegistryError::NotFound(custom_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.handlers.keys()).finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
