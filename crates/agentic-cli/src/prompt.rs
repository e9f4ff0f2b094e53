use anyhow::Result;
use agentic::models::message::Message;

pub mod rustyline;

pub trait Prompt {
    /// Show the model's reply
    fn render(&mut self, message: &Message);
    /// Report a failed turn; the session carries on afterwards
    fn render_error(&mut self, error: &anyhow::Error);
    fn get_input(&mut self) -> Result<Input>;
    fn show_busy(&mut self);
    fn hide_busy(&mut self);
    fn close(&self);
    fn agent_ready(&self) {
        println!("\n💬 Agent is running. Type 'exit' or 'quit' to end.");
        println!("{}", "-".repeat(50));
    }
}

#[derive(Debug, PartialEq)]
pub struct Input {
    pub input_type: InputType,
    pub content: Option<String>, // Optional content as sometimes the user may be issuing a command eg. (Exit)
}

#[derive(Debug, PartialEq)]
pub enum InputType {
    AskAgain, // Ask the user for input again. Control flow command.
    Message,  // User sent a message
    Exit,     // User wants to exit the session
}

impl Input {
    pub fn exit() -> Self {
        Input {
            input_type: InputType::Exit,
            content: None,
        }
    }

    pub fn ask_again() -> Self {
        Input {
            input_type: InputType::AskAgain,
            content: None,
        }
    }

    pub fn message<S: Into<String>>(content: S) -> Self {
        Input {
            input_type: InputType::Message,
            content: Some(content.into()),
        }
    }
}

/// Classify one line typed by the user
pub fn parse_input(line: &str) -> Input {
    let text = line.trim();
    if text.eq_ignore_ascii_case("exit") || text.eq_ignore_ascii_case("quit") {
        Input::exit()
    } else if text.is_empty() {
        Input::ask_again()
    } else {
        Input::message(line)
    }
}
