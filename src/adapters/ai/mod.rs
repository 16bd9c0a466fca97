//! Decision-support AI adapters.
//!
//! ## Available Adapters
//!
//! - `ScriptedDecisionSupport` - Replays queued answers; used for demos and tests
//!
//! Answers are turned into suggestions by `parse_suggestions`, shared by
//! every adapter.

mod scripted_decision_support;
mod suggestion_parser;

pub use scripted_decision_support::{ScriptedDecisionSupport, DEFAULT_MAX_PROMPT_CHARS};
pub use suggestion_parser::parse_suggestions;
