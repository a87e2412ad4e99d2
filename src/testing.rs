//! Test doubles shared by the unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::ResponseError;
use crate::response::{MessageReply, ModalForm, Reply, Responder};

/// Records every reply instead of sending it. Optionally fails every send.
#[derive(Default)]
pub(crate) struct RecordingResponder {
    sent: Mutex<Vec<Reply>>,
    fail: bool,
}

impl RecordingResponder {
    pub(crate) fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub(crate) fn sent(&self) -> Vec<Reply> {
        self.sent.lock().unwrap().clone()
    }

    pub(crate) fn messages(&self) -> Vec<MessageReply> {
        self.sent()
            .into_iter()
            .filter_map(|r| match r {
                Reply::Message(m) => Some(m),
                Reply::Modal(_) => None,
            })
            .collect()
    }

    pub(crate) fn modals(&self) -> Vec<ModalForm> {
        self.sent()
            .into_iter()
            .filter_map(|r| match r {
                Reply::Modal(m) => Some(m),
                Reply::Message(_) => None,
            })
            .collect()
    }
}

#[async_trait]
impl Responder for RecordingResponder {
    async fn send(&self, reply: Reply) -> Result<(), ResponseError> {
        if self.fail {
            return Err(ResponseError::Transport("connection reset".to_string()));
        }
        self.sent.lock().unwrap().push(reply);
        Ok(())
    }
}
