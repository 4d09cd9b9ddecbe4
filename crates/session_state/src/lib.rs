//! session_state - View-state machine for the emergency-assistance session
//!
//! The session moves Home → Assessing → Protocol → Chat, with skip paths
//! into Chat and a reset back to Home from anywhere.

pub mod machine;

// Re-export commonly used types
pub use machine::{SessionEvent, StateMachine, StateTransition, TransitionError, ViewState};
