//! A Discord chess bot built around a command registry and an interaction
//! dispatcher.
//!
//! Handlers implement [`command::Command`] or [`registry::ComponentHandler`]
//! and answer through an [`response::InteractionContext`], which lets each
//! interaction be acknowledged exactly once. The [`dispatch::Dispatcher`]
//! routes every inbound interaction to its handler and answers on the
//! handler's behalf when it fails.
//!
//! With the `io` feature (on by default), [`bot::start`] connects the
//! dispatcher to Discord through twilight's gateway and HTTP clients.

pub mod command;
pub mod commands;
pub mod dispatch;
pub mod error;
pub mod interaction;
pub mod platform;
pub mod registry;
pub mod response;

#[cfg(feature = "io")]
pub mod bot;
#[cfg(feature = "io")]
pub mod config;

#[cfg(test)]
mod testing;
