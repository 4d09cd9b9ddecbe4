//! State transitions - FSM transition logic
//!
//! Implements the state machine that handles event-driven view transitions.

use thiserror::Error;

use super::events::SessionEvent;
use super::states::ViewState;

/// Error type for invalid state transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invalid transition from {from:?} with event {event}")]
    InvalidTransition { from: ViewState, event: String },
}

/// Represents a state transition result.
#[derive(Debug, Clone)]
pub struct StateTransition {
    /// The state before the transition.
    pub from: ViewState,
    /// The state after the transition.
    pub to: ViewState,
    /// The event that triggered the transition.
    pub event: SessionEvent,
    /// Whether the state actually changed.
    pub changed: bool,
}

/// State machine for the session's view lifecycle.
#[derive(Debug, Clone)]
pub struct StateMachine {
    current_state: ViewState,
    /// Transition history (limited).
    history: Vec<StateTransition>,
    max_history: usize,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    /// Create a new state machine on the home view.
    pub fn new() -> Self {
        Self::with_state(ViewState::Home)
    }

    /// Create a state machine with a specific initial state.
    pub fn with_state(state: ViewState) -> Self {
        Self {
            current_state: state,
            history: Vec::new(),
            max_history: 50,
        }
    }

    pub fn state(&self) -> ViewState {
        self.current_state
    }

    pub fn history(&self) -> &[StateTransition] {
        &self.history
    }

    /// Handle an event and transition to a new state.
    ///
    /// Invalid events leave the current state untouched.
    pub fn handle_event(&mut self, event: SessionEvent) -> Result<StateTransition, TransitionError> {
        let old_state = self.current_state;
        let new_state = Self::compute_next_state(old_state, &event).ok_or_else(|| {
            TransitionError::InvalidTransition {
                from: old_state,
                event: event.name().to_string(),
            }
        })?;

        self.current_state = new_state;

        let transition = StateTransition {
            from: old_state,
            to: new_state,
            event,
            changed: old_state != new_state,
        };

        self.history.push(transition.clone());
        if self.history.len() > self.max_history {
            self.history.remove(0);
        }

        Ok(transition)
    }

    fn compute_next_state(state: ViewState, event: &SessionEvent) -> Option<ViewState> {
        use SessionEvent::*;
        use ViewState::*;

        match (state, event) {
            (Home, Start { .. }) => Some(Assessing),
            (Assessing, Confirm) => Some(Protocol),
            (Protocol, Proceed) => Some(Chat),
            (Assessing | Protocol, Skip) => Some(Chat),
            (_, Reset) => Some(Home),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> SessionEvent {
        SessionEvent::Start {
            disaster: "Flood".to_string(),
        }
    }

    #[test]
    fn test_full_flow() {
        let mut sm = StateMachine::new();
        assert_eq!(sm.state(), ViewState::Home);

        assert!(sm.handle_event(start()).unwrap().changed);
        assert_eq!(sm.state(), ViewState::Assessing);

        sm.handle_event(SessionEvent::Confirm).unwrap();
        assert_eq!(sm.state(), ViewState::Protocol);

        sm.handle_event(SessionEvent::Proceed).unwrap();
        assert_eq!(sm.state(), ViewState::Chat);
    }

    #[test]
    fn test_skip_paths() {
        let mut sm = StateMachine::with_state(ViewState::Assessing);
        sm.handle_event(SessionEvent::Skip).unwrap();
        assert_eq!(sm.state(), ViewState::Chat);

        let mut sm = StateMachine::with_state(ViewState::Protocol);
        sm.handle_event(SessionEvent::Skip).unwrap();
        assert_eq!(sm.state(), ViewState::Chat);
    }

    #[test]
    fn test_reset_from_any_state() {
        for state in [ViewState::Home, ViewState::Assessing, ViewState::Protocol, ViewState::Chat] {
            let mut sm = StateMachine::with_state(state);
            let transition = sm.handle_event(SessionEvent::Reset).unwrap();
            assert_eq!(sm.state(), ViewState::Home);
            assert_eq!(transition.changed, state != ViewState::Home);
        }
    }

    #[test]
    fn test_invalid_transition_keeps_state() {
        let mut sm = StateMachine::new();
        let err = sm.handle_event(SessionEvent::Confirm).unwrap_err();
        assert_eq!(
            err,
            TransitionError::InvalidTransition {
                from: ViewState::Home,
                event: "confirm".to_string(),
            }
        );
        assert_eq!(sm.state(), ViewState::Home);
        assert!(sm.history().is_empty());

        assert!(sm.handle_event(SessionEvent::Skip).is_err());
        let mut sm = StateMachine::with_state(ViewState::Chat);
        assert!(sm.handle_event(start()).is_err());
    }

    #[test]
    fn test_history_tracking() {
        let mut sm = StateMachine::new();
        sm.handle_event(start()).unwrap();
        sm.handle_event(SessionEvent::Skip).unwrap();

        assert_eq!(sm.history().len(), 2);
        assert_eq!(sm.history()[1].from, ViewState::Assessing);
        assert_eq!(sm.history()[1].to, ViewState::Chat);
    }
}
