//! `/play`: open a game and post the "Make a move" button.

use async_trait::async_trait;

use super::make_move::make_move_button;
use crate::command::{Command, CommandDescriptor, OptionSpec, OptionType};
use crate::error::HandlerResult;
use crate::response::{InteractionContext, MessageReply};

pub struct Play;

#[async_trait]
impl Command for Play {
    fn descriptor(&self) -> CommandDescriptor {
        CommandDescriptor::new("play", "Start a game of chess").option(OptionSpec::new(
            OptionType::User,
            "opponent",
            "Who to challenge (anyone, if left out)",
        ))
    }

    async fn execute(&self, ctx: &InteractionContext) -> HandlerResult {
        let interaction = ctx.interaction();
        let challenger = interaction
            .user_mention()
            .unwrap_or_else(|| "Someone".to_string());

        let content = match interaction.field("opponent") {
            Some(opponent) => format!(
                "♟️ {} challenges <@{}> to a game of chess! White to move.",
                challenger, opponent
            ),
            None => format!(
                "♟️ {} wants to play chess! Anyone may answer. White to move.",
                challenger
            ),
        };

        // Games are keyed by the challenger for now.
        let game = interaction.user_id.map(|id| id.to_string());
        let reply = MessageReply::new(content).button(make_move_button(game.as_deref())?);

        ctx.respond(reply).await?;
        Ok(())
    }
}
