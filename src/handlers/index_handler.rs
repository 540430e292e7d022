use axum::{
    extract::State,
    response::{Html, IntoResponse},
};
use tower_sessions::Session;

use crate::flow::AuthFlowOrchestrator;
use crate::models::{AppState, FlowError};
use crate::views;

/// Issues a fresh state for this session and renders the grant link.
pub(crate) async fn render_entry_page(
    orchestrator: &AuthFlowOrchestrator,
    session: &Session,
) -> Result<Html<String>, FlowError> {
    let authorization_url = orchestrator.initiate(session).await?;
    Ok(Html(views::index_page(&authorization_url)))
}

pub async fn index_handler(
    State(app_state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, FlowError> {
    render_entry_page(&app_state.orchestrator, &session).await
}
