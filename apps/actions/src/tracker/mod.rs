//! Wire types for the host dialogue runtime's action-server protocol.
//!
//! The runtime POSTs the tracker (slots, latest message, event history) with the
//! name of the action to run and expects slot events plus bot messages back.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::conversation::{ConversationState, StateDelta, TurnOutcome};

pub mod recovery;

pub const RESUME_UPLOADED_SLOT: &str = "resume_uploaded";
pub const RESUME_TEXT_SLOT: &str = "resume_text";

// ────────────────────────────────────────────────────────────────────────────
// Inbound
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct ActionRequest {
    pub next_action: String,
    #[serde(default)]
    pub sender_id: Option<String>,
    #[serde(default)]
    pub tracker: Tracker,
}

impl ActionRequest {
    /// Conversation id, preferring the top-level field the runtime sends.
    pub fn sender_id(&self) -> &str {
        self.sender_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(self.tracker.sender_id.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Tracker {
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub slots: HashMap<String, Value>,
    #[serde(default)]
    pub latest_message: LatestMessage,
    #[serde(default)]
    pub events: Vec<TrackerEvent>,
}

impl Tracker {
    pub fn latest_text(&self) -> &str {
        self.latest_message.text.as_deref().unwrap_or("")
    }

    pub fn latest_intent(&self) -> Option<&str> {
        self.latest_message
            .intent
            .as_ref()
            .and_then(|i| i.name.as_deref())
    }

    /// The resume state exactly as the slots currently hold it.
    pub fn slot_state(&self) -> ConversationState {
        let resume_uploaded = self
            .slots
            .get(RESUME_UPLOADED_SLOT)
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let resume_text = self
            .slots
            .get(RESUME_TEXT_SLOT)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        ConversationState {
            resume_uploaded,
            resume_text,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LatestMessage {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub intent: Option<IntentRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntentRef {
    #[serde(default)]
    pub name: Option<String>,
}

/// One entry of the tracker's event history. Only slot events are interpreted.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerEvent {
    pub event: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<Value>,
}

#[cfg(test)]
impl TrackerEvent {
    pub fn slot(name: &str, value: Value) -> Self {
        Self {
            event: "slot".to_string(),
            name: Some(name.to_string()),
            value: Some(value),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Outbound
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ActionResponse {
    pub events: Vec<SlotSet>,
    pub responses: Vec<BotMessage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotSet {
    pub event: &'static str,
    pub timestamp: Option<f64>,
    pub name: &'static str,
    pub value: Value,
}

impl SlotSet {
    fn new(name: &'static str, value: Value) -> Self {
        Self {
            event: "slot",
            timestamp: None,
            name,
            value,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BotMessage {
    pub text: String,
}

impl From<TurnOutcome> for ActionResponse {
    fn from(outcome: TurnOutcome) -> Self {
        let events = outcome.delta.map(slot_events).unwrap_or_default();
        let responses = outcome
            .messages
            .into_iter()
            .map(|text| BotMessage { text })
            .collect();
        ActionResponse { events, responses }
    }
}

fn slot_events(delta: StateDelta) -> Vec<SlotSet> {
    let mut events = vec![SlotSet::new(
        RESUME_UPLOADED_SLOT,
        Value::Bool(delta.resume_uploaded),
    )];
    if let Some(text) = delta.resume_text {
        events.push(SlotSet::new(RESUME_TEXT_SLOT, Value::String(text)));
    }
    events
}

/// Listing entry for `GET /actions`.
#[derive(Debug, Clone, Serialize)]
pub struct ActionInfo {
    pub name: &'static str,
}
