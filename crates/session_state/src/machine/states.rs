//! View states - the screens a session moves through.

use serde::{Deserialize, Serialize};

/// Exactly one view is active at a time.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    /// Disaster selection.
    #[default]
    Home,
    /// Location acquisition and severity input.
    Assessing,
    /// Protocol and nearby resources (possibly still loading).
    Protocol,
    /// Ongoing conversation with the crisis specialist.
    Chat,
}
