use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::actions::handlers::run_action;
use crate::actions::{Action, ACTIONS};
use crate::errors::AppError;
use crate::state::AppState;
use crate::tracker::{ActionInfo, ActionRequest, ActionResponse};

/// POST /webhook
///
/// Runs the action the dialogue runtime asks for. Every registered action
/// answers 200 with messages and slot events, even when the turn itself failed.
pub async fn handle_webhook(
    State(state): State<AppState>,
    payload: Result<Json<ActionRequest>, JsonRejection>,
) -> Result<Json<ActionResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let action = route(&request).ok_or_else(|| {
        AppError::NotFound(format!(
            "No registered action found for name '{}'",
            request.next_action
        ))
    })?;

    let outcome = run_action(&state, action, request.sender_id(), &request.tracker).await;
    Ok(Json(ActionResponse::from(outcome)))
}

/// The runtime normally names the action; an empty name falls back to the intent.
fn route(request: &ActionRequest) -> Option<Action> {
    if request.next_action.is_empty() {
        request
            .tracker
            .latest_intent()
            .and_then(Action::from_intent)
    } else {
        Action::from_action_name(&request.next_action)
    }
}

/// GET /actions
pub async fn handle_list_actions() -> Json<Vec<ActionInfo>> {
    Json(ACTIONS.iter().map(|(name, _)| ActionInfo { name }).collect())
}
