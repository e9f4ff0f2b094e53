//! These models represent the objects passed around by the agent
//!
//! Two formats meet here: the conversation as the REPL sees it, and the
//! Gemini `contents` payload the provider speaks. Both are converted into
//! these internal structs immediately, so neither wire format leaks past
//! the provider module.
pub mod message;
pub mod role;
pub mod tool;
