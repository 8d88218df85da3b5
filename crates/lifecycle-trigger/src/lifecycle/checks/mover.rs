use super::{LifecycleCheck, Shortcut};
use crate::lifecycle::domain::{IdentitySnapshot, ProcessKind};
use crate::lifecycle::lookup::{process_flag, ConfigurationLookup, LookupError, PolicyOption};

/// Transfer check. Only meaningful for identities that already existed.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoverCheck;

impl LifecycleCheck for MoverCheck {
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
            && process_flag(config, ProcessKind::Mover, PolicyOption::RequireCorrelated)?
        {
            return Ok(Shortcut::CancelImmediately);
        }

        Ok(Shortcut::Continue)
    }
}
