//! Turn handlers: upload, the shared question handler, and slot debugging.
//!
//! Handlers never fail. Every problem is turned into a chat message so the
//! runtime always receives a completed turn.

use tracing::{debug, info, warn};

use crate::actions::messages::{
    text_preview, upload_succeeded, DEBUG_HEADER, UPLOAD_COMMAND, UPLOAD_FIRST,
    UPLOAD_FOLLOW_UP, UPLOAD_USAGE,
};
use crate::actions::prompts::build_prompt;
use crate::actions::{Action, Category};
use crate::document::extract_resume_text;
use crate::models::conversation::{ConversationState, StateDelta, TurnOutcome};
use crate::session::SessionStore;
use crate::state::AppState;
use crate::tracker::recovery::recover_state;
use crate::tracker::Tracker;

/// Runs one action for one turn of conversation `sender_id`.
pub async fn run_action(
    state: &AppState,
    action: Action,
    sender_id: &str,
    tracker: &Tracker,
) -> TurnOutcome {
    debug!("Running {} for sender {sender_id}", action.name());
    match action {
        Action::UploadResume => handle_upload(state, sender_id, tracker.latest_text()).await,
        Action::Ask(category) => handle_question(state, category, sender_id, tracker).await,
        Action::DebugSlots => handle_debug(state, sender_id, tracker).await,
    }
}

/// The path after `/upload `, or `None` when the message is not an upload command.
pub fn parse_upload_command(message: &str) -> Option<&str> {
    message.strip_prefix(UPLOAD_COMMAND).map(str::trim)
}

pub async fn handle_upload(state: &AppState, sender_id: &str, message: &str) -> TurnOutcome {
    let Some(path) = parse_upload_command(message) else {
        return TurnOutcome::reply(UPLOAD_USAGE).with_delta(StateDelta::not_uploaded());
    };

    match extract_resume_text(path).await {
        Ok(text) => {
            info!(
                "Resume accepted for sender {sender_id}: {} chars",
                text.chars().count()
            );
            let resolved = ConversationState::uploaded(text);
            remember(state.sessions.as_ref(), sender_id, &resolved).await;
            TurnOutcome {
                messages: vec![upload_succeeded(path), UPLOAD_FOLLOW_UP.to_string()],
                delta: Some(StateDelta::reassert(&resolved)),
            }
        }
        Err(e) => {
            info!("Resume rejected for sender {sender_id}: {e}");
            TurnOutcome::reply(e.user_message()).with_delta(StateDelta::not_uploaded())
        }
    }
}

/// Shared handler for every extraction category.
pub async fn handle_question(
    state: &AppState,
    category: Category,
    sender_id: &str,
    tracker: &Tracker,
) -> TurnOutcome {
    let resolved = resolve_state(state.sessions.as_ref(), sender_id, tracker).await;
    if !resolved.is_usable() {
        return TurnOutcome::reply(UPLOAD_FIRST);
    }

    let utterance = if category.uses_utterance() {
        tracker.latest_text()
    } else {
        ""
    };
    let prompt = build_prompt(category, &resolved.resume_text, utterance);
    let reply = state.completion.complete(&prompt).await;

    remember(state.sessions.as_ref(), sender_id, &resolved).await;
    TurnOutcome::reply(format!("{}{reply}", category.reply_prefix()))
        .with_delta(StateDelta::reassert(&resolved))
}

pub async fn handle_debug(state: &AppState, sender_id: &str, tracker: &Tracker) -> TurnOutcome {
    let resolved = resolve_state(state.sessions.as_ref(), sender_id, tracker).await;
    let text = resolved.resume_text.as_str();

    let mut messages = vec![
        DEBUG_HEADER.to_string(),
        format!(
            "📊 resume_uploaded: {}",
            if resolved.resume_uploaded { "True" } else { "False" }
        ),
        format!(
            "📝 resume_text exists: {}",
            if text.is_empty() { "No" } else { "Yes" }
        ),
        format!("📏 resume_text length: {} characters", text.chars().count()),
    ];
    if !text.is_empty() {
        messages.push(format!("👀 Text preview: {}", text_preview(text)));
    }

    TurnOutcome {
        messages,
        delta: Some(StateDelta::reassert(&resolved)),
    }
}

/// Slots first, then the session store, then a replay of the tracker's event log.
pub async fn resolve_state(
    sessions: &dyn SessionStore,
    sender_id: &str,
    tracker: &Tracker,
) -> ConversationState {
    let slots = tracker.slot_state();
    if slots.is_usable() {
        return slots;
    }

    if !sender_id.is_empty() {
        match sessions.load(sender_id).await {
            Ok(Some(stored)) if stored.is_usable() => {
                debug!("Slots empty for sender {sender_id}; restored from session store");
                return stored;
            }
            Ok(_) => {}
            Err(e) => warn!("Session lookup failed for sender {sender_id}: {e}"),
        }
    }

    let recovered = recover_state(&slots, &tracker.events);
    debug!(
        "Slot recovery for sender {sender_id}: uploaded={}, text_length={}",
        recovered.resume_uploaded,
        recovered.resume_text.chars().count()
    );
    recovered
}

async fn remember(sessions: &dyn SessionStore, sender_id: &str, resolved: &ConversationState) {
    if sender_id.is_empty() {
        return;
    }
    if let Err(e) = sessions.save(sender_id, resolved).await {
        warn!("Session save failed for sender {sender_id}: {e}");
    }
}
