use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
};
use tower_sessions::Session;
use tracing::info;

use crate::models::{AppState, FlowError};

pub async fn logout_handler(
    State(app_state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, FlowError> {
    app_state.orchestrator.clear(&session).await?;
    info!("Session tokens cleared");
    Ok(Redirect::to("/"))
}
