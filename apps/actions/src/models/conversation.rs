use serde::{Deserialize, Serialize};

/// Per-conversation resume state, mirrored in the host's slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    pub resume_uploaded: bool,
    pub resume_text: String,
}

impl ConversationState {
    pub fn uploaded(resume_text: impl Into<String>) -> Self {
        Self {
            resume_uploaded: true,
            resume_text: resume_text.into(),
        }
    }

    /// A question can only be answered when both fields agree that a resume exists.
    pub fn is_usable(&self) -> bool {
        self.resume_uploaded && !self.resume_text.is_empty()
    }
}

/// Slot writes produced by one turn. `resume_text: None` leaves the text slot untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateDelta {
    pub resume_uploaded: bool,
    pub resume_text: Option<String>,
}

impl StateDelta {
    pub fn not_uploaded() -> Self {
        Self {
            resume_uploaded: false,
            resume_text: None,
        }
    }

    /// Writes both fields back, so a host that dropped them between turns gets them again.
    pub fn reassert(state: &ConversationState) -> Self {
        Self {
            resume_uploaded: state.resume_uploaded,
            resume_text: Some(state.resume_text.clone()),
        }
    }
}

/// Everything a handler produces for a single user turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnOutcome {
    pub messages: Vec<String>,
    pub delta: Option<StateDelta>,
}

impl TurnOutcome {
    pub fn reply(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
            delta: None,
        }
    }

    pub fn with_delta(mut self, delta: StateDelta) -> Self {
        self.delta = Some(delta);
        self
    }
}
