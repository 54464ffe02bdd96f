//! Slot recovery from the tracker's event history.
//!
//! The host runtime occasionally hands us a tracker whose resume slots were
//! dropped between turns. The event log still holds every slot write, so the
//! most recent non-empty `resume_text` write is treated as the live value.

use serde_json::Value;

use crate::models::conversation::ConversationState;
use crate::tracker::{TrackerEvent, RESUME_TEXT_SLOT};

/// Returns `current` untouched when it is usable; otherwise replays `events`.
pub fn recover_state(current: &ConversationState, events: &[TrackerEvent]) -> ConversationState {
    if current.is_usable() {
        return current.clone();
    }

    match last_resume_text(events) {
        Some(text) => ConversationState::uploaded(text),
        None => ConversationState::default(),
    }
}

/// Newest-first search for the last slot event that set a non-empty resume text.
pub fn last_resume_text(events: &[TrackerEvent]) -> Option<&str> {
    events.iter().rev().find_map(|event| {
        if event.event != "slot" || event.name.as_deref() != Some(RESUME_TEXT_SLOT) {
            return None;
        }
        match &event.value {
            Some(Value::String(text)) if !text.is_empty() => Some(text.as_str()),
            _ => None,
        }
    })
}
