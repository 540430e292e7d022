use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
};
use tower_sessions::Session;
use tracing::info;

use crate::flow::CallbackOutcome;
use crate::handlers::index_handler::render_entry_page;
use crate::models::oauth::CallbackParams;
use crate::models::{AppState, FlowError};
use crate::views;

pub async fn callback_handler(
    Query(params): Query<CallbackParams>,
    State(app_state): State<AppState>,
    session: Session,
) -> Result<Response, FlowError> {
    info!(
        "OAuth callback received (code present: {}, state present: {})",
        params.code.is_some(),
        params.state.is_some()
    );

    match app_state
        .orchestrator
        .handle_callback(&session, params)
        .await?
    {
        CallbackOutcome::StateMismatch => Ok(render_entry_page(&app_state.orchestrator, &session)
            .await?
            .into_response()),
        CallbackOutcome::Authenticated { claims, profile } => {
            Ok(Html(views::result_page(&claims, &profile)).into_response())
        }
    }
}
