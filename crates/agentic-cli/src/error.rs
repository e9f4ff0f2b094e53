use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {env_var}: {reason}")]
    InvalidValue { env_var: String, reason: String },
    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

// Convert a settings key such as `agent.max_turns` to its environment variable name
pub fn to_env_var(field_path: &str) -> String {
    format!("AGENTIC_{}", field_path.to_uppercase().replace('.', "__"))
}
