//! The "Make a move" button and the modal it opens.
//!
//! Pressing the button shows a two-field form asking for the origin and
//! destination squares. Submitting the form posts the move to the channel,
//! or privately explains what was wrong with the input.

use async_trait::async_trait;
use tracing::info;

use super::square::{InvalidSquare, Square};
use crate::error::{HandlerResult, RegistryError};
use crate::registry::{keyed_custom_id, ComponentHandler};
use crate::response::{ButtonSpec, InteractionContext, MessageReply, ModalForm, TextField};

/// customID of the button.
pub const MAKE_MOVE: &str = "makeMove";
/// customID of the modal form.
pub const MOVE_MODAL: &str = "moveModal";
/// customID of the origin-square field.
pub const OLD_POSITION: &str = "oldPosition";
/// customID of the destination-square field.
pub const NEW_POSITION: &str = "newPosition";

/// The button posted under a game message. `game` is carried through the
/// customID so the modal submission can be tied back to it.
pub fn make_move_button(game: Option<&str>) -> Result<ButtonSpec, RegistryError> {
    Ok(ButtonSpec::new(keyed_custom_id(MAKE_MOVE, game)?, "Make a move"))
}

/// The move-entry form.
pub fn move_form(game: Option<&str>) -> Result<ModalForm, RegistryError> {
    Ok(ModalForm::new(keyed_custom_id(MOVE_MODAL, game)?, "Make a move")
        .field(TextField::short(OLD_POSITION, "Old position").placeholder("a1"))
        .field(TextField::short(NEW_POSITION, "New position").placeholder("h8")))
}

// ---------------------------------------------------------------------------
// Button
// ---------------------------------------------------------------------------

pub struct MakeMoveButton;

#[async_trait]
impl ComponentHandler for MakeMoveButton {
    fn custom_id(&self) -> &str {
        MAKE_MOVE
    }

    async fn execute(&self, ctx: &InteractionContext) -> HandlerResult {
        let game = ctx.interaction().target_argument();
        ctx.show_modal(move_form(game)?).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Modal submission
// ---------------------------------------------------------------------------

pub struct MoveSubmission;

fn read_square(ctx: &InteractionContext, field: &str) -> Result<Square, InvalidSquare> {
    ctx.interaction().field(field).unwrap_or_default().parse()
}

#[async_trait]
impl ComponentHandler for MoveSubmission {
    fn custom_id(&self) -> &str {
        MOVE_MODAL
    }

    async fn execute(&self, ctx: &InteractionContext) -> HandlerResult {
        let squares = read_square(ctx, OLD_POSITION)
            .and_then(|from| read_square(ctx, NEW_POSITION).map(|to| (from, to)));

        let reply = match squares {
            Ok((from, to)) if from == to => {
                MessageReply::ephemeral("A piece has to move to a different square.")
            }
            Ok((from, to)) => {
                let player = ctx
                    .interaction()
                    .user_mention()
                    .unwrap_or_else(|| "Someone".to_string());
                info!(
                    user = ?ctx.interaction().user_id,
                    game = ?ctx.interaction().target_argument(),
                    from = %from,
                    to = %to,
                    "move submitted"
                );
                MessageReply::new(format!("{} moved {} → {}", player, from, to))
            }
            Err(e) => MessageReply::ephemeral(format!(
                "Couldn't read that move: {}. Use squares like a1 or h8.",
                e
            )),
        };

        ctx.respond(reply).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
