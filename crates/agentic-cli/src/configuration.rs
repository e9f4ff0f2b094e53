use crate::error::{to_env_var, ConfigError};
use agentic::agent::DEFAULT_MAX_TURNS;
use agentic::providers::configs::{GeminiProviderConfig, GEMINI_HOST, GEMINI_MODEL};
use config::{Config, Environment, File};
use serde::Deserialize;

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Answer questions clearly and concisely.";

/// Optional settings file looked up in the working directory (`agentic.toml`)
const CONFIG_FILE: &str = "agentic";

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<i32>,
    #[serde(default = "default_convert_system_message")]
    pub convert_system_message_to_human: bool,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            model: default_model(),
            temperature: None,
            max_tokens: None,
            convert_system_message_to_human: default_convert_system_message(),
        }
    }
}

impl ProviderSettings {
    // Convert to the agentic GeminiProviderConfig
    pub fn into_config(self, api_key: String) -> GeminiProviderConfig {
        GeminiProviderConfig {
            host: self.host,
            api_key,
            model: self.model,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            convert_system_message_to_human: self.convert_system_message_to_human,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentSettings {
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            max_turns: default_max_turns(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub agent: AgentSettings,
}

/// Values given on the command line, which win over every other source
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub model: Option<String>,
    pub host: Option<String>,
    pub temperature: Option<f32>,
    pub max_turns: Option<usize>,
}

impl Settings {
    pub fn new(overrides: &Overrides) -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Defaults
            .set_default("provider.host", default_host())?
            .set_default("provider.model", default_model())?
            .set_default(
                "provider.convert_system_message_to_human",
                default_convert_system_message(),
            )?
            .set_default("agent.system_prompt", default_system_prompt())?
            .set_default("agent.max_turns", default_max_turns() as i64)?
            // Then the optional settings file
            .add_source(File::with_name(CONFIG_FILE).required(false))
            // Layer on the environment variables
            .add_source(
                Environment::with_prefix("AGENTIC")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // And finally the command line
            .set_override_option("provider.model", overrides.model.clone())?
            .set_override_option("provider.host", overrides.host.clone())?
            .set_override_option(
                "provider.temperature",
                overrides.temperature.map(f64::from),
            )?
            .set_override_option(
                "agent.max_turns",
                overrides.max_turns.map(|turns| turns as i64),
            )?
            .build()?;

        let settings: Settings = config.try_deserialize().map_err(|err| {
            tracing::debug!("Configuration error: {:?}", &err);
            ConfigError::Other(err)
        })?;
        settings.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.agent.max_turns == 0 {
            return Err(ConfigError::InvalidValue {
                env_var: to_env_var("agent.max_turns"),
                reason: "must be at least 1".to_string(),
            });
        }
        if let Some(temperature) = self.provider.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ConfigError::InvalidValue {
                    env_var: to_env_var("provider.temperature"),
                    reason: format!("{} is outside 0.0..=2.0", temperature),
                });
            }
        }
        if self.provider.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                env_var: to_env_var("provider.model"),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(self)
    }
}

fn default_host() -> String {
    GEMINI_HOST.to_string()
}

fn default_model() -> String {
    GEMINI_MODEL.to_string()
}

fn default_convert_system_message() -> bool {
    true
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_max_turns() -> usize {
    DEFAULT_MAX_TURNS
}
