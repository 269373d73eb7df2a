//! Test case drafting through a chat-completion model.

pub mod generator;
pub mod openai;
pub mod prompt;

pub use generator::*;
pub use openai::*;
pub use prompt::*;
