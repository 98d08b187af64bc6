//! UI state machine
//!
//! Prompt, Menu, Result and Sleep, with an explicit transition function
//! and the synchronous render / read-key / process loop that drives them.

pub mod machine;
pub mod prompt;
pub mod result;

pub use machine::{run, RunError, UiState};
pub use prompt::{PromptOutcome, PromptState};
pub use result::{ResultOutcome, ResultState};
