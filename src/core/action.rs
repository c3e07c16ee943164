//! Actions that drive payment transitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A requested change to a payment's lifecycle.
///
/// Branching is always expressed as distinct actions: a `(state, action)` pair
/// resolves to at most one target state.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Submit,
    Approve,
    Reject,
    Process,
    Complete,
    Fail,
    Retry,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Submit,
        Action::Approve,
        Action::Reject,
        Action::Process,
        Action::Complete,
        Action::Fail,
        Action::Retry,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Process => "process",
            Self::Complete => "complete",
            Self::Fail => "fail",
            Self::Retry => "retry",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_serializes_as_snake_case() {
        assert_eq!(serde_json::to_string(&Action::Approve).unwrap(), "\"approve\"");
        let parsed: Action = serde_json::from_str("\"retry\"").unwrap();
        assert_eq!(parsed, Action::Retry);
    }

    #[test]
    fn display_uses_name() {
        for action in Action::ALL {
            assert_eq!(action.to_string(), action.name());
        }
    }
}
