use anyhow::{Context, Result};
use std::future::Future;
use std::io;

use crate::agents::agent::Agent;
use crate::prompt::{InputType, Prompt};
use agentic::models::message::Message;

pub struct Session<'a> {
    agent: Box<dyn Agent + 'a>,
    prompt: Box<dyn Prompt + 'a>,
    messages: Vec<Message>,
}

impl<'a> Session<'a> {
    pub fn new(agent: Box<dyn Agent + 'a>, prompt: Box<dyn Prompt + 'a>) -> Self {
        Session {
            agent,
            prompt,
            messages: Vec::new(),
        }
    }

    pub async fn start(&mut self) -> Result<()> {
        self.run(tokio::signal::ctrl_c).await
    }

    /// The loop behind `start`. `interrupt` is raced against every agent call and
    /// ends the session when it completes first.
    async fn run<F, Fut>(&mut self, mut interrupt: F) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = io::Result<()>>,
    {
        self.prompt.agent_ready();

        loop {
            let input = match self.prompt.get_input() {
                Ok(input) => input,
                Err(e) => {
                    self.prompt.render_error(&e);
                    break;
                }
            };
            let content = match (input.input_type, input.content) {
                (InputType::Exit, _) => break,
                (InputType::Message, Some(content)) => content,
                (InputType::Message, None) | (InputType::AskAgain, _) => continue,
            };

            self.prompt.show_busy();
            let outcome = tokio::select! {
                reply = self.process_message(content) => Some(reply),
                _ = interrupt() => None,
            };
            self.prompt.hide_busy();

            match outcome {
                Some(Ok(reply)) => self.prompt.render(&reply),
                Some(Err(e)) => {
                    tracing::debug!("Turn failed: {}", e);
                    self.prompt.render_error(&e);
                }
                // Interrupted while the agent was working
                None => break,
            }
        }

        self.prompt.close();
        Ok(())
    }

    /// Run one turn. The user message stays in the history even if the turn fails.
    async fn process_message(&mut self, content: String) -> Result<Message> {
        self.messages.push(Message::user().with_text(content));

        let history = self.agent.invoke(&self.messages).await?;
        let reply = history
            .last()
            .cloned()
            .context("Agent returned an empty conversation")?;

        self.messages.push(reply.clone());
        Ok(reply)
    }

    #[cfg(test)]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}
