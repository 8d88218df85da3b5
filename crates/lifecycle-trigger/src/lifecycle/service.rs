use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::domain::{IdentityId, ProcessKind};
use super::engine::{DecisionEngine, DecisionError, FinalAction};
use super::lookup::{ConfigurationLookup, LookupError};
use super::provider::{IdentitySnapshotProvider, ProviderError};

/// Service composing the snapshot store, policy configuration and decision engine.
pub struct LifecycleTriggerService<P, C> {
    provider: Arc<P>,
    engine: DecisionEngine<Arc<C>>,
}

impl<P, C> LifecycleTriggerService<P, C>
where
    P: IdentitySnapshotProvider + 'static,
    C: ConfigurationLookup + 'static,
{
    pub fn new(provider: Arc<P>, config: Arc<C>) -> Self {
        Self {
            provider,
            engine: DecisionEngine::new(config),
        }
    }

    pub fn engine(&self) -> &DecisionEngine<Arc<C>> {
        &self.engine
    }

    /// Load both snapshots for `identity` and decide whether `process` should run.
    pub fn evaluate(
        &self,
        identity: &IdentityId,
        process: &str,
    ) -> Result<TriggerEvaluation, TriggerServiceError> {
        let current = self.provider.current(identity)?;
        let previous = self.provider.previous(identity)?;
        let display_name = current
            .as_ref()
            .map(|snapshot| snapshot.display_name().to_string())
            .unwrap_or_else(|| identity.0.clone());

        let action = self
            .engine
            .decide(process, previous.as_ref(), current.as_ref(), &display_name)?;

        let trigger_filter = match action {
            FinalAction::DeferToFilters { .. } => self.engine.trigger_filter(process)?,
            _ => None,
        };

        Ok(TriggerEvaluation {
            identity: identity.clone(),
            display_name,
            process: ProcessKind::from_name(process),
            process_name: process.trim().to_string(),
            action,
            trigger_filter,
        })
    }
}

/// Evaluation result returned to the process launcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerEvaluation {
    pub identity: IdentityId,
    pub display_name: String,
    pub process: ProcessKind,
    /// Requested name, kept so the launcher can start processes outside the known kinds.
    pub process_name: String,
    pub action: FinalAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_filter: Option<String>,
}

impl TriggerEvaluation {
    /// Settle a deferral for launchers that have no filter stage of their own.
    pub fn outcome(&self) -> TriggerOutcome {
        match (self.action, &self.trigger_filter) {
            (FinalAction::Run, _) => TriggerOutcome::Run,
            (FinalAction::Skip, _) => TriggerOutcome::Skip,
            (FinalAction::SkipAndMarkSkipped, _) => TriggerOutcome::SkipAndMarkSkipped,
            (FinalAction::DeferToFilters { .. }, Some(filter)) => {
                TriggerOutcome::EvaluateFilter(filter.clone())
            }
            (FinalAction::DeferToFilters { optional: true }, None) => TriggerOutcome::Skip,
            (FinalAction::DeferToFilters { optional: false }, None) => TriggerOutcome::Run,
        }
    }
}

/// What the launcher should do once deferrals are settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "filter", rename_all = "snake_case")]
pub enum TriggerOutcome {
    Run,
    Skip,
    SkipAndMarkSkipped,
    EvaluateFilter(String),
}

/// Error raised by the trigger service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TriggerServiceError {
    #[error(transparent)]
    Decision(#[from] DecisionError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Configuration(#[from] LookupError),
}
