use super::{LifecycleCheck, Shortcut};
use crate::lifecycle::domain::IdentitySnapshot;
use crate::lifecycle::lookup::{ConfigurationLookup, LookupError};

/// Stand-in for processes without a dedicated check; always defers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCheck;

impl LifecycleCheck for NoopCheck {
    fn evaluate(
        &self,
        _previous: Option<&IdentitySnapshot>,
        _current: &IdentitySnapshot,
        _config: &dyn ConfigurationLookup,
    ) -> Result<Shortcut, LookupError> {
        Ok(Shortcut::Continue)
    }
}
