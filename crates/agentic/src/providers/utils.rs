use anyhow::{anyhow, Result};
use regex::Regex;
use serde_json::{json, Map, Value};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use super::base::Usage;
use crate::errors::AgentError;
use crate::models::message::{ContentPart, Message, MessageContent};
use crate::models::role::Role;
use crate::models::tool::{Tool, ToolCall};

/// Convert internal Message format to Gemini's `contents` specification
///
/// Gemini pairs a `functionResponse` with its `functionCall` by name rather than by id,
/// so the names of earlier tool requests are tracked while walking the conversation.
/// A response whose request never made it onto the wire (because the request itself was
/// an error) is sent as plain text instead.
pub fn messages_to_gemini_spec(messages: &[Message]) -> Vec<Value> {
    let mut contents = Vec::new();
    let mut call_names: HashMap<String, String> = HashMap::new();

    for message in messages {
        let role = match message.role {
            Role::User => "user",
            Role::Assistant => "model",
        };

        let mut parts = Vec::new();
        for part in message.content.to_parts() {
            match part {
                ContentPart::Text(text) => {
                    if !text.text.is_empty() {
                        parts.push(json!({ "text": text.text }));
                    }
                }
                ContentPart::ToolRequest(request) => match &request.tool_call {
                    Ok(tool_call) => {
                        let name = sanitize_function_name(&tool_call.name);
                        call_names.insert(request.id.clone(), name.clone());
                        let args = if tool_call.arguments.is_object() {
                            tool_call.arguments.clone()
                        } else {
                            json!({})
                        };
                        parts.push(json!({
                            "functionCall": {
                                "name": name,
                                "args": args,
                            }
                        }));
                    }
                    Err(e) => {
                        tracing::debug!("Not sending failed tool request {}: {}", request.id, e);
                    }
                },
                ContentPart::ToolResponse(response) => {
                    match (call_names.get(&response.id), &response.tool_result) {
                        (Some(name), Ok(output)) => parts.push(json!({
                            "functionResponse": {
                                "name": name,
                                "response": { "content": output },
                            }
                        })),
                        (Some(name), Err(e)) => parts.push(json!({
                            "functionResponse": {
                                "name": name,
                                "response": { "error": e.to_string() },
                            }
                        })),
                        (None, Ok(output)) => parts.push(json!({ "text": output })),
                        (None, Err(e)) => parts.push(json!({
                            "text": format!("The tool call returned the following error:\n{}", e)
                        })),
                    }
                }
            }
        }

        if !parts.is_empty() {
            contents.push(json!({ "role": role, "parts": parts }));
        }
    }

    contents
}

/// Place the system prompt in front of the first user turn, for models treated as having
/// no system role. A conversation with no user turn gets one.
pub fn prepend_system_as_human(contents: &mut Vec<Value>, system: &str) {
    if system.is_empty() {
        return;
    }
    let system_part = json!({ "text": system });

    let first_user = contents
        .iter_mut()
        .find(|content| content["role"] == "user")
        .and_then(|content| content["parts"].as_array_mut());

    match first_user {
        Some(parts) => parts.insert(0, system_part),
        None => contents.insert(0, json!({ "role": "user", "parts": [system_part] })),
    }
}

/// Convert internal Tool format to Gemini's `functionDeclarations`
pub fn tools_to_gemini_spec(tools: &[Tool]) -> Result<Vec<Value>> {
    let mut tool_names = HashSet::new();
    let mut declarations = Vec::new();

    for tool in tools {
        if !tool_names.insert(&tool.name) {
            return Err(anyhow!("Duplicate tool name: {}", tool.name));
        }

        let mut declaration = Map::new();
        declaration.insert("name".to_string(), json!(tool.name));
        declaration.insert("description".to_string(), json!(tool.description));
        // Gemini rejects an object schema without properties, so parameterless tools omit it
        let has_properties = tool
            .input_schema
            .get("properties")
            .and_then(Value::as_object)
            .is_some_and(|properties| !properties.is_empty());
        if has_properties {
            declaration.insert("parameters".to_string(), strip_defaults(&tool.input_schema));
        }
        declarations.push(Value::Object(declaration));
    }

    Ok(declarations)
}

/// Gemini's schema subset has no `default` keyword
fn strip_defaults(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| key.as_str() != "default")
                .map(|(key, value)| (key.clone(), strip_defaults(value)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Convert a Gemini `generateContent` response to internal Message format
pub fn gemini_response_to_message(response: &Value) -> Result<Message> {
    let candidate = response
        .get("candidates")
        .and_then(|candidates| candidates.get(0))
        .ok_or_else(|| {
            let reason = response
                .pointer("/promptFeedback/blockReason")
                .and_then(Value::as_str)
                .unwrap_or("no candidates returned");
            anyhow!("Gemini returned no reply: {}", reason)
        })?;

    let Some(parts) = candidate.pointer("/content/parts").and_then(Value::as_array) else {
        let reason = candidate
            .get("finishReason")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        return Err(anyhow!(
            "Gemini returned an empty reply (finish reason: {})",
            reason
        ));
    };

    let mut content = Vec::new();
    for part in parts {
        if part.get("thought").and_then(Value::as_bool) == Some(true) {
            continue;
        }

        if let Some(text) = part.get("text").and_then(Value::as_str) {
            content.push(ContentPart::text(text));
        } else if let Some(call) = part.get("functionCall") {
            let id = format!("call_{}", Uuid::new_v4().simple());
            let function_name = call
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default();

            if !is_valid_function_name(function_name) {
                let error = AgentError::ToolNotFound(format!(
                    "The provided function name '{}' had invalid characters, it must match this regex [a-zA-Z0-9_-]+",
                    function_name
                ));
                content.push(ContentPart::tool_request(id, Err(error)));
                continue;
            }

            match call.get("args") {
                None | Some(Value::Null) => content.push(ContentPart::tool_request(
                    id,
                    Ok(ToolCall::new(function_name, json!({}))),
                )),
                Some(args @ Value::Object(_)) => content.push(ContentPart::tool_request(
                    id,
                    Ok(ToolCall::new(function_name, args.clone())),
                )),
                Some(other) => {
                    let error = AgentError::InvalidParameters(format!(
                        "Could not interpret tool use parameters for {}: expected an object, got {}",
                        function_name, other
                    ));
                    content.push(ContentPart::tool_request(id, Err(error)));
                }
            }
        } else {
            tracing::debug!("Skipping unsupported Gemini part: {}", part);
        }
    }

    // A lone text part comes back as plain content, anything richer as parts
    let single_text = match content.as_slice() {
        [ContentPart::Text(text)] => Some(text.text.clone()),
        _ => None,
    };
    let body = match single_text {
        Some(text) => MessageContent::Plain(text),
        None => MessageContent::Parts(content),
    };

    Ok(Message::new(Role::Assistant, body))
}

pub fn get_usage(data: &Value) -> Usage {
    let Some(usage) = data.get("usageMetadata") else {
        return Usage::default();
    };

    let count = |key: &str| usage.get(key).and_then(Value::as_i64).map(|v| v as i32);
    let input_tokens = count("promptTokenCount");
    let output_tokens = count("candidatesTokenCount");
    let total_tokens = count("totalTokenCount").or_else(|| match (input_tokens, output_tokens) {
        (Some(input), Some(output)) => Some(input + output),
        _ => None,
    });

    Usage::new(input_tokens, output_tokens, total_tokens)
}

fn sanitize_function_name(name: &str) -> String {
    let re = Regex::new(r"[^a-zA-Z0-9_-]").unwrap();
    re.replace_all(name, "_").to_string()
}

fn is_valid_function_name(name: &str) -> bool {
    let re = Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
    re.is_match(name)
}
