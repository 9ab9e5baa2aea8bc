//! Session phase transitions
//!
//! ```text
//! Idle ──submit──▶ Submitting ──ok / edit / delete──▶ RefetchPending
//!  ▲                   │                                   │
//!  └──create failed────┘                                   │
//!  └───────────────────────fetch completed─────────────────┘
//! ```

use crate::error::SessionError;
use crate::state::Phase;

/// Phases reachable from `from` in one step
#[must_use]
pub fn allowed_transitions(from: Phase) -> &'static [Phase] {
    match from {
        Phase::Idle => &[Phase::Submitting],
        Phase::Submitting => &[Phase::Idle, Phase::RefetchPending],
        Phase::RefetchPending => &[Phase::Idle],
    }
}

/// Check a phase change against [`allowed_transitions`]
///
/// # Errors
/// Returns [`SessionError::InvalidTransition`] for any other change
pub fn validate_transition(from: Phase, to: Phase) -> Result<(), SessionError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(SessionError::InvalidTransition { from, to })
    }
}
