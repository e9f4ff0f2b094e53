use anyhow::Result;

use crate::errors::AgentError;
use crate::models::message::{ContentPart, Message, ToolRequest};
use crate::models::tool::Tool;
use crate::providers::base::Provider;
use crate::toolbox::Toolbox;

/// Upper bound on model calls within one `invoke`
pub const DEFAULT_MAX_TURNS: usize = 25;

/// Agent integrates a chat model with the tools it is allowed to call
pub struct Agent {
    provider: Box<dyn Provider>,
    toolbox: Toolbox,
    system_prompt: String,
    max_turns: usize,
}

impl Agent {
    /// Create a new Agent bound to a provider, a fixed toolbox and a system prompt
    pub fn new<S: Into<String>>(
        provider: Box<dyn Provider>,
        toolbox: Toolbox,
        system_prompt: S,
    ) -> Self {
        Self {
            provider,
            toolbox,
            system_prompt: system_prompt.into(),
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn tools(&self) -> Vec<Tool> {
        self.toolbox.tools()
    }

    /// Run a single tool request, turning any failure into an error result the model can read
    fn dispatch_tool_call(&self, request: &ToolRequest) -> ContentPart {
        let result = match &request.tool_call {
            Ok(call) => self.toolbox.call(call),
            Err(e) => Err(e.clone()),
        };
        if let Err(e) = &result {
            tracing::warn!("Tool request {} failed: {}", request.id, e);
        }
        ContentPart::tool_response(request.id.clone(), result)
    }

    /// Answer the latest user message.
    ///
    /// Returns `messages` extended with everything produced while answering: each model
    /// reply and, for replies that ask for tools, a user message carrying the tool results.
    /// The last element is the model's final reply. Tool requests in one reply are
    /// executed in order, one at a time.
    pub async fn invoke(&self, messages: &[Message]) -> Result<Vec<Message>> {
        let mut messages = messages.to_vec();
        let tools = self.toolbox.tools();

        for turn in 0..self.max_turns {
            let (response, _usage) = self
                .provider
                .complete(&self.system_prompt, &messages, &tools)
                .await?;
            messages.push(response.clone());

            let tool_requests = response.tool_requests();
            if tool_requests.is_empty() {
                tracing::debug!("Reply finished after {} model turns", turn + 1);
                return Ok(messages);
            }

            let mut message_tool_response = Message::user();
            for request in tool_requests {
                message_tool_response =
                    message_tool_response.with_part(self.dispatch_tool_call(request));
            }
            messages.push(message_tool_response);
        }

        Err(AgentError::TurnLimitExceeded(self.max_turns).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AgentResult;
    use crate::models::message::MessageContent;
    use crate::models::role::Role;
    use crate::models::tool::ToolCall;
    use crate::providers::mock::MockProvider;
    use serde_json::json;

    fn echo_toolbox() -> Toolbox {
        Toolbox::new().with_tool(
            Tool::new(
                "echo",
                "Echoes back the input",
                json!({"type": "object", "properties": {"message": {"type": "string"}}, "required": ["message"]}),
            ),
            |args| -> AgentResult<String> {
                Ok(args["message"].as_str().unwrap_or("").to_string())
            },
        )
    }

    fn tool_responses(message: &Message) -> Vec<(String, AgentResult<String>)> {
        message
            .content
            .to_parts()
            .iter()
            .filter_map(ContentPart::as_tool_response)
            .map(|response| (response.id.clone(), response.tool_result.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_simple_response() -> Result<()> {
        let response = Message::new(Role::Assistant, "Hello!");
        let provider = MockProvider::new(vec![response.clone()]);
        let agent = Agent::new(Box::new(provider), Toolbox::local(), "Be helpful.");

        let initial_messages = vec![Message::user().with_text("Hi")];
        let messages = agent.invoke(&initial_messages).await?;

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], initial_messages[0]);
        assert_eq!(messages[1], response);
        Ok(())
    }

    #[tokio::test]
    async fn test_tool_call() -> Result<()> {
        let provider = MockProvider::new(vec![
            Message::assistant().with_tool_request(
                "1",
                Ok(ToolCall::new("echo", json!({"message": "test"}))),
            ),
            Message::assistant().with_text("Done!"),
        ]);
        let seen = provider.seen();
        let agent = Agent::new(Box::new(provider), echo_toolbox(), "Be helpful.");

        let messages = agent
            .invoke(&[Message::user().with_text("Echo test")])
            .await?;

        // user, tool request, tool response, final text
        assert_eq!(messages.len(), 4);
        assert!(messages[1].has_tool_request());
        assert_eq!(messages[2].role, Role::User);
        assert_eq!(
            tool_responses(&messages[2]),
            vec![("1".to_string(), Ok("test".to_string()))]
        );
        assert_eq!(messages.last().unwrap().text(), "Done!");

        // The second model call sees the tool result
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_tool() -> Result<()> {
        let provider = MockProvider::new(vec![
            Message::assistant()
                .with_tool_request("1", Ok(ToolCall::new("invalid_tool", json!({})))),
            Message::assistant().with_text("Error occurred"),
        ]);
        let agent = Agent::new(Box::new(provider), echo_toolbox(), "Be helpful.");

        let messages = agent
            .invoke(&[Message::user().with_text("Invalid tool")])
            .await?;

        assert_eq!(messages.len(), 4);
        assert_eq!(
            tool_responses(&messages[2]),
            vec![(
                "1".to_string(),
                Err(AgentError::ToolNotFound("invalid_tool".to_string()))
            )]
        );
        assert_eq!(messages[3].text(), "Error occurred");
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_tool_request_is_answered() -> Result<()> {
        let provider = MockProvider::new(vec![
            Message::assistant().with_tool_request(
                "1",
                Err(AgentError::InvalidParameters("bad args".to_string())),
            ),
            Message::assistant().with_text("Sorry"),
        ]);
        let agent = Agent::new(Box::new(provider), echo_toolbox(), "Be helpful.");

        let messages = agent.invoke(&[Message::user().with_text("Go")]).await?;

        assert_eq!(
            tool_responses(&messages[2]),
            vec![(
                "1".to_string(),
                Err(AgentError::InvalidParameters("bad args".to_string()))
            )]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_multiple_tool_calls() -> Result<()> {
        let provider = MockProvider::new(vec![
            Message::assistant()
                .with_tool_request("1", Ok(ToolCall::new("echo", json!({"message": "first"}))))
                .with_tool_request("2", Ok(ToolCall::new("echo", json!({"message": "second"})))),
            Message::assistant().with_text("All done!"),
        ]);
        let agent = Agent::new(Box::new(provider), echo_toolbox(), "Be helpful.");

        let messages = agent
            .invoke(&[Message::user().with_text("Multiple calls")])
            .await?;

        assert_eq!(messages.len(), 4);
        assert_eq!(
            tool_responses(&messages[2]),
            vec![
                ("1".to_string(), Ok("first".to_string())),
                ("2".to_string(), Ok("second".to_string()))
            ]
        );
        assert_eq!(
            messages[3].content,
            MessageContent::Parts(vec![ContentPart::text("All done!")])
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_local_tools_through_agent() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("greeting.txt");
        let path_str = path.to_str().unwrap();

        let provider = MockProvider::new(vec![
            Message::assistant().with_tool_request(
                "w",
                Ok(ToolCall::new(
                    "create_file",
                    json!({"path": path_str, "content": "hello"}),
                )),
            ),
            Message::assistant().with_tool_request(
                "r",
                Ok(ToolCall::new("read_file", json!({"path": path_str}))),
            ),
            Message::assistant().with_text("The file says hello"),
        ]);
        let agent = Agent::new(Box::new(provider), Toolbox::local(), "Be helpful.");

        let messages = agent
            .invoke(&[Message::user().with_text("Write then read")])
            .await?;

        assert_eq!(messages.len(), 6);
        assert_eq!(
            tool_responses(&messages[4]),
            vec![("r".to_string(), Ok("hello".to_string()))]
        );
        assert_eq!(std::fs::read_to_string(&path)?, "hello");
        Ok(())
    }

    #[tokio::test]
    async fn test_turn_limit() {
        let looping = || {
            Message::assistant()
                .with_tool_request("1", Ok(ToolCall::new("echo", json!({"message": "again"}))))
        };
        let provider = MockProvider::new(vec![looping(), looping(), looping()]);
        let agent = Agent::new(Box::new(provider), echo_toolbox(), "Be helpful.").with_max_turns(2);

        let error = agent
            .invoke(&[Message::user().with_text("Loop")])
            .await
            .unwrap_err();
        assert_eq!(
            error.downcast_ref::<AgentError>(),
            Some(&AgentError::TurnLimitExceeded(2))
        );
    }

    #[test]
    fn test_agent_exposes_configuration() {
        let agent = Agent::new(
            Box::new(MockProvider::new(vec![])),
            Toolbox::local(),
            "Answer clearly.",
        );
        assert_eq!(agent.system_prompt(), "Answer clearly.");
        assert_eq!(agent.tools().len(), 4);
    }
}
