use anyhow::{Context, Result};
use std::env;

use agentic::agent::Agent;
use agentic::providers::gemini::GeminiProvider;
use agentic::toolbox::Toolbox;

use crate::configuration::Settings;

pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Look up the API key, printing a status line either way. `None` means startup should stop.
pub fn require_api_key() -> Option<String> {
    let api_key = validate_api_key(env::var(API_KEY_VAR).ok());
    match &api_key {
        Some(_) => println!("🟢 {} loaded.", API_KEY_VAR),
        None => println!("🔴 Error: {} not found in .env file.", API_KEY_VAR),
    }
    api_key
}

// An empty value counts as missing
fn validate_api_key(value: Option<String>) -> Option<String> {
    value.filter(|key| !key.trim().is_empty())
}

/// Build the agent: Gemini model, the four local tools and the configured system prompt
pub fn build_agent(settings: &Settings, api_key: String) -> Result<Agent> {
    let provider = GeminiProvider::new(settings.provider.clone().into_config(api_key))
        .context("Failed to initialize the Gemini client")?;
    println!("🟢 Gemini model {} initialized.", provider.model());

    let toolbox = Toolbox::local();
    let tool_count = toolbox.len();
    let agent = Agent::new(
        Box::new(provider),
        toolbox,
        settings.agent.system_prompt.as_str(),
    )
    .with_max_turns(settings.agent.max_turns);
    println!("🟢 Agent created with {} tools.", tool_count);

    Ok(agent)
}
