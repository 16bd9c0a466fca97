//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Decision-support AI (scripted answers, suggestion parsing)
//! - `registry` - Health registry (in-memory)
//! - `signature` - Doctor's electronic signature (HMAC-SHA256)

pub mod ai;
pub mod registry;
pub mod signature;

pub use ai::{parse_suggestions, ScriptedDecisionSupport};
pub use registry::InMemoryHealthRegistry;
pub use signature::HmacSignatureProvider;
