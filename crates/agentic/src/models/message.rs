use super::role::Role;
use super::tool::ToolCall;
use crate::errors::AgentResult;
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolRequest {
    pub id: String,
    pub tool_call: AgentResult<ToolCall>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResponse {
    pub id: String,
    pub tool_result: AgentResult<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
/// A typed part of a structured message
pub enum ContentPart {
    Text(TextContent),
    ToolRequest(ToolRequest),
    ToolResponse(ToolResponse),
}

impl ContentPart {
    pub fn text<S: Into<String>>(text: S) -> Self {
        ContentPart::Text(TextContent { text: text.into() })
    }

    pub fn tool_request<S: Into<String>>(id: S, tool_call: AgentResult<ToolCall>) -> Self {
        ContentPart::ToolRequest(ToolRequest {
            id: id.into(),
            tool_call,
        })
    }

    pub fn tool_response<S: Into<String>>(id: S, tool_result: AgentResult<String>) -> Self {
        ContentPart::ToolResponse(ToolResponse {
            id: id.into(),
            tool_result,
        })
    }

    /// Get the text content if this is a Text variant
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentPart::Text(text) => Some(&text.text),
            _ => None,
        }
    }

    pub fn as_tool_request(&self) -> Option<&ToolRequest> {
        if let ContentPart::ToolRequest(ref tool_request) = self {
            Some(tool_request)
        } else {
            None
        }
    }

    pub fn as_tool_response(&self) -> Option<&ToolResponse> {
        if let ContentPart::ToolResponse(ref tool_response) = self {
            Some(tool_response)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
/// The body of a message: either a bare string or an ordered list of typed parts
pub enum MessageContent {
    Plain(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// The user-visible text of this content.
    ///
    /// Plain content is returned as is. For structured content the text of
    /// every text part is concatenated in order; tool requests and tool
    /// responses are bookkeeping between the agent and the model and are
    /// left out.
    pub fn display_text(&self) -> String {
        match self {
            MessageContent::Plain(text) => text.clone(),
            MessageContent::Parts(parts) => parts.iter().filter_map(ContentPart::as_text).collect(),
        }
    }

    /// Number of parts that `display_text` leaves out
    pub fn hidden_parts(&self) -> usize {
        match self {
            MessageContent::Plain(_) => 0,
            MessageContent::Parts(parts) => parts.iter().filter(|p| p.as_text().is_none()).count(),
        }
    }

    /// View the content as parts; plain text becomes a single text part
    pub fn to_parts(&self) -> Vec<ContentPart> {
        match self {
            MessageContent::Plain(text) if text.is_empty() => Vec::new(),
            MessageContent::Plain(text) => vec![ContentPart::text(text.clone())],
            MessageContent::Parts(parts) => parts.clone(),
        }
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Plain(text.to_string())
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Plain(text)
    }
}

impl From<Vec<ContentPart>> for MessageContent {
    fn from(parts: Vec<ContentPart>) -> Self {
        MessageContent::Parts(parts)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A message to or from an LLM
pub struct Message {
    pub role: Role,
    pub created: i64,
    pub content: MessageContent,
}

impl Message {
    pub fn new<C: Into<MessageContent>>(role: Role, content: C) -> Self {
        Message {
            role,
            created: Utc::now().timestamp(),
            content: content.into(),
        }
    }

    /// Create a new, empty user message with the current timestamp
    pub fn user() -> Self {
        Self::new(Role::User, Vec::new())
    }

    /// Create a new, empty assistant message with the current timestamp
    pub fn assistant() -> Self {
        Self::new(Role::Assistant, Vec::new())
    }

    /// Append a part, turning plain content into structured content first
    pub fn with_part(mut self, part: ContentPart) -> Self {
        let mut parts = self.content.to_parts();
        parts.push(part);
        self.content = MessageContent::Parts(parts);
        self
    }

    /// Add text content to the message
    pub fn with_text<S: Into<String>>(self, text: S) -> Self {
        self.with_part(ContentPart::text(text))
    }

    /// Add a tool request to the message
    pub fn with_tool_request<S: Into<String>>(
        self,
        id: S,
        tool_call: AgentResult<ToolCall>,
    ) -> Self {
        self.with_part(ContentPart::tool_request(id, tool_call))
    }

    /// Add a tool response to the message
    pub fn with_tool_response<S: Into<String>>(self, id: S, result: AgentResult<String>) -> Self {
        self.with_part(ContentPart::tool_response(id, result))
    }

    /// The text shown to the user for this message
    pub fn text(&self) -> String {
        self.content.display_text()
    }

    pub fn tool_requests(&self) -> Vec<&ToolRequest> {
        match &self.content {
            MessageContent::Plain(_) => Vec::new(),
            MessageContent::Parts(parts) => parts.iter().filter_map(|p| p.as_tool_request()).collect(),
        }
    }

    pub fn has_tool_request(&self) -> bool {
        !self.tool_requests().is_empty()
    }
}
