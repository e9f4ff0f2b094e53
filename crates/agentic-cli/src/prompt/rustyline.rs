use anyhow::Result;
use bat::WrappingMode;
use cliclack::spinner;
use console::style;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use agentic::models::message::Message;

use super::{parse_input, Input, Prompt};

const PROMPT: &str = "You: ";
const THEME: &str = "zenburn";

pub struct RustylinePrompt {
    editor: DefaultEditor,
    spinner: cliclack::ProgressBar,
}

impl RustylinePrompt {
    pub fn new() -> Result<Self> {
        Ok(RustylinePrompt {
            editor: DefaultEditor::new()?,
            spinner: spinner(),
        })
    }
}

fn print_markdown(content: &str) {
    let printed = bat::PrettyPrinter::new()
        .input(bat::Input::from_bytes(content.as_bytes()))
        .theme(THEME)
        .language("Markdown")
        .wrapping_mode(WrappingMode::Character)
        .print();

    if let Err(e) = printed {
        tracing::debug!("Falling back to plain output: {}", e);
        print!("{}", content);
    }
    if !content.ends_with('\n') {
        println!();
    }
}

/// Ctrl-C and Ctrl-D at the prompt both end the session
fn to_input(line: Result<String, ReadlineError>) -> Result<Input> {
    match line {
        Ok(line) => Ok(parse_input(&line)),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(Input::exit()),
        Err(e) => Err(e.into()),
    }
}

impl Prompt for RustylinePrompt {
    fn render(&mut self, message: &Message) {
        let hidden = message.content.hidden_parts();
        if hidden > 0 {
            tracing::debug!("Not showing {} non-text parts of the reply", hidden);
        }

        print!("{} ", style("Agent:").bold());
        print_markdown(&message.text());
    }

    fn render_error(&mut self, error: &anyhow::Error) {
        println!("{} {}", style("🔴 Error:").red(), error);
        eprintln!("{:?}", error);
    }

    fn show_busy(&mut self) {
        self.spinner = spinner();
        self.spinner.start("Thinking...");
    }

    fn hide_busy(&mut self) {
        self.spinner.stop("");
    }

    fn get_input(&mut self) -> Result<Input> {
        let line = self.editor.readline(PROMPT);
        if let Ok(line) = &line {
            if !line.trim().is_empty() {
                self.editor.add_history_entry(line.as_str())?;
            }
        }
        to_input(line)
    }

    fn close(&self) {
        println!("\n👋 Goodbye!");
    }
}
