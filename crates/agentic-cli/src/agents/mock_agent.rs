use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use agentic::models::message::Message;

use crate::agents::agent::Agent;

/// Replies with scripted results, recording the history it was handed each time
pub struct MockAgent {
    replies: Mutex<Vec<Result<Message, String>>>,
    calls: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl MockAgent {
    pub fn new(replies: Vec<Result<Message, String>>) -> Self {
        Self {
            replies: Mutex::new(replies),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<Vec<Message>>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Agent for MockAgent {
    async fn invoke(&self, messages: &[Message]) -> Result<Vec<Message>> {
        self.calls.lock().unwrap().push(messages.to_vec());
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(anyhow!("no scripted reply left"));
        }
        let reply = replies.remove(0).map_err(|e| anyhow!(e))?;

        let mut history = messages.to_vec();
        history.push(reply);
        Ok(history)
    }
}
