use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::checks::{check_for, Shortcut};
use super::domain::{IdentitySnapshot, ProcessKind, ProcessingState};
use super::lookup::{option_path, ConfigurationLookup, LookupError, PolicyOption};

/// Action handed to the process launcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FinalAction {
    Run,
    Skip,
    SkipAndMarkSkipped,
    /// `optional` means a missing trigger filter resolves to "do not run".
    DeferToFilters {
        optional: bool,
    },
}

impl FinalAction {
    pub const fn label(self) -> &'static str {
        match self {
            FinalAction::Run => "run",
            FinalAction::Skip => "skip",
            FinalAction::SkipAndMarkSkipped => "skip_and_mark_skipped",
            FinalAction::DeferToFilters { optional: false } => "defer_to_filters",
            FinalAction::DeferToFilters { optional: true } => "defer_to_optional_filters",
        }
    }

    /// Marker the caller must persist against the identity, if any.
    pub const fn required_marker(self) -> Option<ProcessingState> {
        match self {
            FinalAction::SkipAndMarkSkipped => Some(ProcessingState::Skipped),
            _ => None,
        }
    }
}

impl From<Shortcut> for FinalAction {
    fn from(shortcut: Shortcut) -> Self {
        match shortcut {
            Shortcut::PerformImmediately => FinalAction::Run,
            Shortcut::CancelImmediately => FinalAction::Skip,
            Shortcut::CancelAndMarkSkip => FinalAction::SkipAndMarkSkipped,
            Shortcut::Continue => FinalAction::DeferToFilters { optional: false },
            Shortcut::ContinueOptional => FinalAction::DeferToFilters { optional: true },
        }
    }
}

/// Error surfaced by [`DecisionEngine::decide`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecisionError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Configuration(#[from] LookupError),
}

/// Stateless orchestrator that runs the check for a process against fresh configuration.
#[derive(Debug, Clone)]
pub struct DecisionEngine<C> {
    config: C,
}

impl<C: ConfigurationLookup> DecisionEngine<C> {
    pub fn new(config: C) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// Resolve the check for `process`, run it and map the shortcut to an action.
    ///
    /// `display_name` only feeds the log fields. A missing `current` snapshot is a
    /// caller contract violation.
    pub fn decide(
        &self,
        process: &str,
        previous: Option<&IdentitySnapshot>,
        current: Option<&IdentitySnapshot>,
        display_name: &str,
    ) -> Result<FinalAction, DecisionError> {
        let kind = ProcessKind::from_name(process);
        let Some(current) = current else {
            warn!(
                process = %kind,
                identity = display_name,
                "decision requested without a current snapshot"
            );
            return Err(DecisionError::InvalidArgument(
                "current identity snapshot is required".to_string(),
            ));
        };

        let shortcut = self.shortcut(kind, previous, current)?;
        let action = FinalAction::from(shortcut);

        debug!(
            process = %kind,
            requested = process,
            identity = display_name,
            new_identity = previous.is_none(),
            shortcut = shortcut.label(),
            action = action.label(),
            "lifecycle check resolved"
        );

        Ok(action)
    }

    /// Raw check outcome, for callers that want the shortcut itself.
    pub fn shortcut(
        &self,
        kind: ProcessKind,
        previous: Option<&IdentitySnapshot>,
        current: &IdentitySnapshot,
    ) -> Result<Shortcut, LookupError> {
        check_for(kind).evaluate(previous, current, &self.config)
    }

    /// Name of the trigger filter configured for `process`, if any.
    pub fn trigger_filter(&self, process: &str) -> Result<Option<String>, LookupError> {
        let name = process.trim().to_ascii_lowercase();
        let filter = self
            .config
            .get_string(&option_path(&name, PolicyOption::TriggerFilter))?;
        let filter = filter.trim();
        Ok((!filter.is_empty()).then(|| filter.to_string()))
    }
}
