use serde_json::{json, Value};

use crate::errors::{AgentError, AgentResult};
use crate::models::tool::{Tool, ToolCall};
use crate::tools;

type ToolHandler = Box<dyn Fn(&Value) -> AgentResult<String> + Send + Sync>;

struct ToolEntry {
    tool: Tool,
    handler: ToolHandler,
}

/// A fixed table of tools, built once at startup and handed to the agent.
#[derive(Default)]
pub struct Toolbox {
    entries: Vec<ToolEntry>,
}

impl Toolbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool and the function that executes it
    pub fn with_tool<F>(mut self, tool: Tool, handler: F) -> Self
    where
        F: Fn(&Value) -> AgentResult<String> + Send + Sync + 'static,
    {
        self.entries.push(ToolEntry {
            tool,
            handler: Box::new(handler),
        });
        self
    }

    /// The four local tools: read_file, list_files, create_file and get_system_info
    pub fn local() -> Self {
        Self::new()
            .with_tool(
                Tool::new(
                    "read_file",
                    "Read and return the contents of a local text file given its path.",
                    json!({
                        "type": "object",
                        "required": ["path"],
                        "properties": {
                            "path": {
                                "type": "string",
                                "description": "Absolute or relative path to the file."
                            }
                        }
                    }),
                ),
                |args| Ok(tools::read_file(required_str(args, "path")?)),
            )
            .with_tool(
                Tool::new(
                    "list_files",
                    "List all files and directories in the given folder path. \
                    If no path is provided, list the current directory.",
                    json!({
                        "type": "object",
                        "required": [],
                        "properties": {
                            "folder_path": {
                                "type": "string",
                                "default": ".",
                                "description": "The folder to list. Defaults to the current directory."
                            }
                        }
                    }),
                ),
                |args| {
                    let folder_path = optional_str(args, "folder_path")?.unwrap_or(".");
                    Ok(tools::list_files(folder_path))
                },
            )
            .with_tool(
                Tool::new(
                    "create_file",
                    "Creates a new file at the given path with the provided content. \
                    Overwrites the file if it already exists.",
                    json!({
                        "type": "object",
                        "required": ["path", "content"],
                        "properties": {
                            "path": {
                                "type": "string",
                                "description": "Absolute or relative path of the file to write."
                            },
                            "content": {
                                "type": "string",
                                "description": "The full text to write into the file."
                            }
                        }
                    }),
                ),
                |args| {
                    let path = required_str(args, "path")?;
                    let content = required_str(args, "content")?;
                    Ok(tools::create_file(path, content))
                },
            )
            .with_tool(
                Tool::new(
                    "get_system_info",
                    "Returns basic information about the computer system (OS, version, machine).",
                    json!({
                        "type": "object",
                        "required": [],
                        "properties": {}
                    }),
                ),
                |_| Ok(tools::get_system_info()),
            )
    }

    /// Descriptors for every registered tool, in registration order
    pub fn tools(&self) -> Vec<Tool> {
        self.entries.iter().map(|entry| entry.tool.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run the tool named by `tool_call`
    pub fn call(&self, tool_call: &ToolCall) -> AgentResult<String> {
        let entry = self
            .entries
            .iter()
            .find(|entry| entry.tool.name == tool_call.name)
            .ok_or_else(|| AgentError::ToolNotFound(tool_call.name.clone()))?;

        tracing::debug!(tool = %tool_call.name, arguments = %tool_call.arguments, "calling tool");
        (entry.handler)(&tool_call.arguments)
    }
}

fn required_str<'a>(args: &'a Value, key: &str) -> AgentResult<&'a str> {
    optional_str(args, key)?
        .ok_or_else(|| AgentError::InvalidParameters(format!("Missing required parameter '{}'", key)))
}

fn optional_str<'a>(args: &'a Value, key: &str) -> AgentResult<Option<&'a str>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(AgentError::InvalidParameters(format!(
            "Parameter '{}' must be a string, got {}",
            key, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_local_toolbox_registers_four_tools() {
        let toolbox = Toolbox::local();
        let names: Vec<String> = toolbox.tools().into_iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec!["read_file", "list_files", "create_file", "get_system_info"]
        );
        assert_eq!(toolbox.len(), 4);
    }

    #[test]
    fn test_create_and_read_through_toolbox() {
        let toolbox = Toolbox::local();
        let dir = tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        let path_str = path.to_str().unwrap();

        let created = toolbox
            .call(&ToolCall::new(
                "create_file",
                json!({"path": path_str, "content": "Hello, world!"}),
            ))
            .unwrap();
        assert!(created.contains("Successfully created file"));

        let read = toolbox
            .call(&ToolCall::new("read_file", json!({"path": path_str})))
            .unwrap();
        assert_eq!(read, "Hello, world!");
    }

    #[test]
    fn test_list_files_uses_given_folder() {
        let toolbox = Toolbox::local();
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();

        let listing = toolbox
            .call(&ToolCall::new(
                "list_files",
                json!({"folder_path": dir.path().to_str().unwrap()}),
            ))
            .unwrap();
        assert_eq!(listing, "['a.txt']");
    }

    #[test]
    fn test_list_files_defaults_to_current_directory() {
        let toolbox = Toolbox::local();
        let listing = toolbox
            .call(&ToolCall::new("list_files", json!({})))
            .unwrap();
        // cargo runs tests from the crate root
        assert!(listing.contains("'Cargo.toml'"), "{}", listing);
    }

    #[test]
    fn test_missing_required_parameter() {
        let toolbox = Toolbox::local();
        let error = toolbox
            .call(&ToolCall::new("create_file", json!({"path": "x.txt"})))
            .unwrap_err();
        assert!(matches!(error, AgentError::InvalidParameters(_)));
    }

    #[test]
    fn test_non_string_parameter() {
        let toolbox = Toolbox::local();
        let error = toolbox
            .call(&ToolCall::new("read_file", json!({"path": 42})))
            .unwrap_err();
        assert!(matches!(error, AgentError::InvalidParameters(_)));
    }

    #[test]
    fn test_unknown_tool() {
        let toolbox = Toolbox::local();
        let error = toolbox
            .call(&ToolCall::new("delete_everything", json!({})))
            .unwrap_err();
        assert_eq!(
            error,
            AgentError::ToolNotFound("delete_everything".to_string())
        );
    }

    #[test]
    fn test_custom_tool() {
        let toolbox = Toolbox::new().with_tool(
            Tool::new("echo", "Echoes back the input", json!({"type": "object"})),
            |args| Ok(required_str(args, "message")?.to_string()),
        );

        let result = toolbox
            .call(&ToolCall::new("echo", json!({"message": "hi"})))
            .unwrap();
        assert_eq!(result, "hi");
    }
}
