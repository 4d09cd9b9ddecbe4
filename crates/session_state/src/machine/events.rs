//! Session events - Defines events that trigger view transitions

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    /// A disaster was picked on the home screen.
    Start { disaster: String },

    /// The severity form was submitted.
    Confirm,

    /// The user moved from the protocol to the chat.
    Proceed,

    /// The user jumped straight to the chat.
    Skip,

    /// Full session wipe.
    Reset,
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::Confirm => "confirm",
            Self::Proceed => "proceed",
            Self::Skip => "skip",
            Self::Reset => "reset",
        }
    }
}
