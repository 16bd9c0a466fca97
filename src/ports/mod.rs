//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `HealthRegistry` - National health service: histories and prescriptions
//! - `DecisionSupport` - Treatment decision AI
//! - `SignatureProvider` - Doctor's electronic signature

mod decision_support;
mod health_registry;
mod signature_provider;

pub use decision_support::{AIError, DecisionSupport};
pub use health_registry::{HealthRegistry, RegistryError};
pub use signature_provider::{SignatureError, SignatureProvider};
