//! State machine for tracking the reservation run
//!
//! Every run walks the same forward-only pipeline; the machine records each
//! transition with a timestamp for reporting. There is no resume operation,
//! so state lives in memory only.

use chrono::{DateTime, Utc};

/// Reservation pipeline state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationState {
    Init,
    Staged,
    Substituted,
    Finalized,
    Pruned,
    Published,
    Recorded,
    CleanedUp,
    Done,
    Failed,
}

impl ReservationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::Staged => "STAGED",
            Self::Substituted => "SUBSTITUTED",
            Self::Finalized => "FINALIZED",
            Self::Pruned => "PRUNED",
            Self::Published => "PUBLISHED",
            Self::Recorded => "RECORDED",
            Self::CleanedUp => "CLEANED_UP",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
        }
    }

    /// Terminal states end the run
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// State transition record
#[derive(Debug, Clone, PartialEq)]
pub struct StateTransition {
    pub from: ReservationState,
    pub to: ReservationState,
    pub timestamp: DateTime<Utc>,
}

/// State machine for a single reservation run
pub struct ReservationStateMachine {
    current_state: ReservationState,
    transitions: Vec<StateTransition>,
}

impl Default for ReservationStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ReservationStateMachine {
    pub fn new() -> Self {
        Self {
            current_state: ReservationState::Init,
            transitions: Vec::new(),
        }
    }

    /// Transition to a new state, recording the step
    pub fn transition(&mut self, to: ReservationState) {
        self.transitions.push(StateTransition {
            from: self.current_state,
            to,
            timestamp: Utc::now(),
        });
        self.current_state = to;
    }

    /// Get current state
    pub fn state(&self) -> ReservationState {
        self.current_state
    }

    /// Get transition history as a human-readable string
    pub fn history(&self) -> String {
        self.transitions
            .iter()
            .map(|t| {
                format!(
                    "{}: {} -> {}",
                    t.timestamp.to_rfc3339(),
                    t.from.as_str(),
                    t.to.as_str()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_machine_starts_at_init() {
        let machine = ReservationStateMachine::new();
        assert_eq!(machine.state(), ReservationState::Init);
        assert!(!machine.state().is_terminal());
    }

    #[test]
    fn test_transition_updates_state() {
        let mut machine = ReservationStateMachine::new();
        machine.transition(ReservationState::Staged);
        assert_eq!(machine.state(), ReservationState::Staged);
    }

    #[test]
    fn test_full_success_path() {
        let mut machine = ReservationStateMachine::new();
        for state in [
            ReservationState::Staged,
            ReservationState::Substituted,
            ReservationState::Finalized,
            ReservationState::Pruned,
            ReservationState::Published,
            ReservationState::Recorded,
            ReservationState::CleanedUp,
            ReservationState::Done,
        ] {
            machine.transition(state);
        }

        assert_eq!(machine.state(), ReservationState::Done);
        assert!(machine.state().is_terminal());
    }

    #[test]
    fn test_history_records_transitions() {
        let mut machine = ReservationStateMachine::new();
        machine.transition(ReservationState::Staged);
        machine.transition(ReservationState::Substituted);

        let history = machine.history();
        assert!(history.contains("INIT -> STAGED"));
        assert!(history.contains("STAGED -> SUBSTITUTED"));
    }

    #[test]
    fn test_terminal_states() {
        assert!(ReservationState::Done.is_terminal());
        assert!(ReservationState::Failed.is_terminal());
        assert!(!ReservationState::Published.is_terminal());
    }
}
