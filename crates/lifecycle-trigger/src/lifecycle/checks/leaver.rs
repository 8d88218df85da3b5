use super::{LifecycleCheck, Shortcut};
use crate::lifecycle::domain::{IdentitySnapshot, ProcessKind};
use crate::lifecycle::lookup::{process_flag, ConfigurationLookup, LookupError, PolicyOption};

/// Offboarding check.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeaverCheck;

impl LifecycleCheck for LeaverCheck {
    fn evaluate(
        &self,
        previous: Option<&IdentitySnapshot>,
        current: &IdentitySnapshot,
        config: &dyn ConfigurationLookup,
    ) -> Result<Shortcut, LookupError> {
        if previous.is_none() {
            return Ok(Shortcut::CancelImmediately);
        }

        if !current.is_correlated()
            && process_flag(config, ProcessKind::Leaver, PolicyOption::RequireCorrelated)?
        {
            return Ok(Shortcut::CancelImmediately);
        }

        Ok(Shortcut::Continue)
    }
}
