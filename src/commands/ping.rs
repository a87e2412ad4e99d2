//! `/ping`: liveness check.

use async_trait::async_trait;

use crate::command::{Command, CommandDescriptor};
use crate::error::HandlerResult;
use crate::response::InteractionContext;

pub struct Ping;

#[async_trait]
impl Command for Ping {
    fn descriptor(&self) -> CommandDescriptor {
        CommandDescriptor::new("ping", "Pong!")
    }

    async fn execute(&self, ctx: &InteractionContext) -> HandlerResult {
        ctx.respond("Pong!").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::InteractionEvent;
    use crate::response::{MessageReply, Reply};
    use crate::testing::RecordingResponder;
    use std::sync::Arc;

    #[test]
    fn descriptor_is_exact() {
        assert_eq!(
            serde_json::to_value(Ping.descriptor()).unwrap(),
            serde_json::json!({ "name": "ping", "description": "Pong!", "options": [] })
        );
    }

    #[tokio::test]
    async fn replies_pong() {
        let responder = Arc::new(RecordingResponder::default());
        let ctx = InteractionContext::new(InteractionEvent::command("ping"), responder.clone());

        Ping.execute(&ctx).await.unwrap();

        assert_eq!(
            responder.sent(),
            vec![Reply::Message(MessageReply::new("Pong!"))]
        );
    }
}
