use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use twilight_http::Client;
use twilight_model::id::marker::{ApplicationMarker, InteractionMarker};
use twilight_model::id::Id;

use super::interaction_response;
use crate::error::ResponseError;
use crate::response::{Reply, Responder};

/// Answers one interaction through Discord's interaction callback endpoint.
#[derive(Debug, Clone)]
pub struct InteractionResponder {
    http: Arc<Client>,
    application_id: Id<ApplicationMarker>,
    interaction_id: Id<InteractionMarker>,
    token: String,
}

impl InteractionResponder {
    pub fn new(
        http: Arc<Client>,
        application_id: Id<ApplicationMarker>,
        interaction_id: Id<InteractionMarker>,
        token: String,
    ) -> Self {
        Self {
            http,
            application_id,
            interaction_id,
            token,
        }
    }
}

#[async_trait]
impl Responder for InteractionResponder {
    async fn send(&self, reply: Reply) -> Result<(), ResponseError> {
        let response = interaction_response(&reply);
        self.http
            .interaction(self.application_id)
            .create_response(self.interaction_id, &self.token, &response)
            .await
            .map_err(|e| ResponseError::Transport(e.to_string()))?;

        debug!(interaction = %self.interaction_id, "interaction response sent");
        Ok(())
    }
}
