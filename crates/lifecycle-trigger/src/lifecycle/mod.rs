//! Joiner, mover and leaver trigger decisions.
//!
//! A caller hands the engine the previous and current snapshot of one identity together
//! with a process name. The engine resolves the check for that process, evaluates it
//! against freshly read policy flags and returns a [`FinalAction`] for the process
//! launcher. Nothing here writes identity state; persisting markers such as `SKIPPED` is
//! left to the launcher.

pub mod batch;
pub mod checks;
pub mod domain;
pub mod engine;
pub mod lookup;
pub mod provider;
pub mod service;

#[cfg(test)]
mod tests;

pub use batch::{BatchDecision, BatchImportError, BatchImporter, BatchReport};
pub use checks::{resolve, LifecycleCheck, Shortcut};
pub use domain::{AccountLink, IdentityId, IdentitySnapshot, ProcessKind, ProcessingState};
pub use engine::{DecisionEngine, DecisionError, FinalAction};
pub use lookup::{
    parse_flag, ConfigurationLookup, DocumentConfiguration, EnvConfiguration,
    LayeredConfiguration, LookupError, PolicyOption,
};
pub use provider::{IdentitySnapshotProvider, ProviderError};
pub use service::{
    LifecycleTriggerService, TriggerEvaluation, TriggerOutcome, TriggerServiceError,
};
