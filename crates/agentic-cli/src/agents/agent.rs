use anyhow::Result;
use async_trait::async_trait;
use agentic::{agent::Agent as ToolAgent, models::message::Message};

/// The part of the agent the session loop depends on
#[async_trait]
pub trait Agent: Send + Sync {
    /// Returns the conversation extended with this turn; the last message is the reply
    async fn invoke(&self, messages: &[Message]) -> Result<Vec<Message>>;
}

#[async_trait]
impl Agent for ToolAgent {
    async fn invoke(&self, messages: &[Message]) -> Result<Vec<Message>> {
        ToolAgent::invoke(self, messages).await
    }
}
