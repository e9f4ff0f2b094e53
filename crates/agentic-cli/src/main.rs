use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

mod agents;
mod bootstrap;
mod configuration;
mod error;
mod prompt;
mod session;

use configuration::{Overrides, Settings};
use prompt::rustyline::RustylinePrompt;
use session::Session;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Gemini model to use (can also be set via AGENTIC_PROVIDER__MODEL)
    #[arg(short, long)]
    model: Option<String>,

    /// Base URL of the Gemini API (can also be set via AGENTIC_PROVIDER__HOST)
    #[arg(long)]
    host: Option<String>,

    /// Sampling temperature between 0.0 and 2.0
    #[arg(short, long)]
    temperature: Option<f32>,

    /// Maximum model calls per question before giving up
    #[arg(long)]
    max_turns: Option<usize>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            model: self.model.clone(),
            host: self.host.clone(),
            temperature: self.temperature,
            max_turns: self.max_turns,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the transcript on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    dotenv().ok();
    let Some(api_key) = bootstrap::require_api_key() else {
        return Ok(());
    };

    let settings = Settings::new(&cli.overrides())?;
    let agent = bootstrap::build_agent(&settings, api_key)?;

    let mut session = Session::new(Box::new(agent), Box::new(RustylinePrompt::new()?));
    session.start().await
}
