use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
};
use thiserror::Error;

use crate::views;

/// Terminal failures of one login attempt.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("callback state does not match the issued state")]
    StateMismatch,
    #[error("callback is missing the authorization code")]
    MissingCode,
    #[error("identity provider refused the authorization: {0}")]
    ProviderDenied(String),
    #[error("failed to exchange token: {0}")]
    TokenExchange(String),
    #[error("failed to fetch user profile: {0}")]
    ProfileFetch(String),
    #[error("failed to decode identity token: {0}")]
    ClaimDecode(String),
    #[error("session error: {0}")]
    Session(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl FlowError {
    pub fn status(&self) -> StatusCode {
        match self {
            FlowError::StateMismatch | FlowError::MissingCode | FlowError::ProviderDenied(_) => {
                StatusCode::BAD_REQUEST
            }
            FlowError::TokenExchange(_)
            | FlowError::ProfileFetch(_)
            | FlowError::ClaimDecode(_) => StatusCode::BAD_GATEWAY,
            FlowError::Session(_) | FlowError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for FlowError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        (status, Html(views::error_page(&self.to_string()))).into_response()
    }
}

impl From<tower_sessions::session::Error> for FlowError {
    fn from(err: tower_sessions::session::Error) -> Self {
        FlowError::Session(err.to_string())
    }
}
