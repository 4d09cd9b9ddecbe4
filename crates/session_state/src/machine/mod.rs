//! State machine module
//!
//! Contains the FSM implementation for the session's view lifecycle.

mod events;
mod states;
mod transitions;

pub use events::SessionEvent;
pub use states::ViewState;
pub use transitions::{StateMachine, StateTransition, TransitionError};
