use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
};
use tower_sessions::Session;
use tracing::debug;

use crate::models::{AppState, FlowError};

pub async fn login_handler(
    State(app_state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, FlowError> {
    let authorization_url = app_state.orchestrator.initiate(&session).await?;

    debug!(
        "oauth state stored for session ID: {:?}. Redirecting to Webex...",
        session.id()
    );
    Ok(Redirect::to(&authorization_url))
}
