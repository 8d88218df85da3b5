mod joiner;
mod leaver;
mod mover;
mod noop;

pub use joiner::JoinerCheck;
pub use leaver::LeaverCheck;
pub use mover::MoverCheck;
pub use noop::NoopCheck;

use serde::{Deserialize, Serialize};

use super::domain::{IdentitySnapshot, ProcessKind};
use super::lookup::{ConfigurationLookup, LookupError};

/// Outcome of a single lifecycle check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shortcut {
    /// Defer to the trigger filter; running is the default.
    Continue,
    /// Defer to the trigger filter; not running is the default.
    ContinueOptional,
    CancelImmediately,
    /// Do not run; the caller persists a skipped marker.
    CancelAndMarkSkip,
    PerformImmediately,
}

impl Shortcut {
    /// Final shortcuts settle the decision without consulting a trigger filter.
    pub const fn is_final(self) -> bool {
        !self.defers()
    }

    pub const fn defers(self) -> bool {
        matches!(self, Shortcut::Continue | Shortcut::ContinueOptional)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Shortcut::Continue => "continue",
            Shortcut::ContinueOptional => "continue_optional",
            Shortcut::CancelImmediately => "cancel_immediately",
            Shortcut::CancelAndMarkSkip => "cancel_and_mark_skip",
            Shortcut::PerformImmediately => "perform_immediately",
        }
    }
}

/// One decision rule chain for a lifecycle process.
///
/// Checks are pure: they read the snapshots and the supplied configuration and return a
/// shortcut. Lookup failures propagate untouched.
pub trait LifecycleCheck: Send + Sync {
    fn evaluate(
        &self,
        previous: Option<&IdentitySnapshot>,
        current: &IdentitySnapshot,
        config: &dyn ConfigurationLookup,
    ) -> Result<Shortcut, LookupError>;
}

/// Map a process name to its check. Unknown names get the no-op check.
pub fn resolve(process_name: &str) -> &'static dyn LifecycleCheck {
    check_for(ProcessKind::from_name(process_name))
}

pub fn check_for(kind: ProcessKind) -> &'static dyn LifecycleCheck {
    match kind {
        ProcessKind::Joiner => &JoinerCheck,
        ProcessKind::Mover => &MoverCheck,
        ProcessKind::Leaver => &LeaverCheck,
        ProcessKind::Unknown => &NoopCheck,
    }
}
