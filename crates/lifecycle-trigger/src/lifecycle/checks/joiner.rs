use super::{LifecycleCheck, Shortcut};
use crate::lifecycle::domain::{IdentitySnapshot, ProcessKind, ProcessingState};
use crate::lifecycle::lookup::{process_flag, ConfigurationLookup, LookupError, PolicyOption};

/// Onboarding check. Rules are evaluated in order and the first match wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct JoinerCheck;

impl LifecycleCheck for JoinerCheck {
    fn evaluate(
        &self,
        previous: Option<&IdentitySnapshot>,
        current: &IdentitySnapshot,
        config: &dyn ConfigurationLookup,
    ) -> Result<Shortcut, LookupError> {
        let state = current.processing_state();

        match state {
            Some(ProcessingState::Processed) => return Ok(Shortcut::CancelImmediately),
            Some(ProcessingState::Forced) => return Ok(Shortcut::PerformImmediately),
            _ => {}
        }

        // A reprocessed skip re-enters at the auto-join rule, not at the top.
        let reprocessing = if state == Some(ProcessingState::Skipped) {
            if !process_flag(config, ProcessKind::Joiner, PolicyOption::ReprocessSkipped)? {
                return Ok(Shortcut::CancelImmediately);
            }
            true
        } else {
            false
        };

        if previous.is_none()
            && !current.has_links()
            && process_flag(
                config,
                ProcessKind::Joiner,
                PolicyOption::AutoJoinNewEmptyIdentities,
            )?
        {
            return Ok(Shortcut::PerformImmediately);
        }

        if !current.is_correlated()
            && process_flag(config, ProcessKind::Joiner, PolicyOption::RequireCorrelated)?
        {
            return Ok(Shortcut::CancelAndMarkSkip);
        }

        if state != Some(ProcessingState::Needed) && !reprocessing {
            return Ok(Shortcut::CancelImmediately);
        }

        Ok(Shortcut::ContinueOptional)
    }
}
