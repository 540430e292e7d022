pub mod id_token;
pub mod session;

use std::sync::Arc;

use oauth2::CsrfToken;
use reqwest::header::ACCEPT;
use tracing::{debug, error, info, warn};

use crate::models::oauth::{
    ACCESS_TOKEN_KEY, CallbackParams, ID_TOKEN_KEY, IdentityClaims, STATE_KEY, TokenPair,
    TokenResponse, UserProfile,
};
use crate::models::{AppConfig, FlowError};

pub use id_token::{IdTokenVerifier, decode_identity_claims};
pub use session::{FlowSession, MemorySession};

#[derive(Debug)]
pub enum CallbackOutcome {
    /// The callback was not bound to a state this session issued.
    StateMismatch,
    Authenticated {
        claims: IdentityClaims,
        profile: UserProfile,
    },
}

/// Drives the authorization code grant against the identity provider.
pub struct AuthFlowOrchestrator {
    config: Arc<AppConfig>,
    http: reqwest::Client,
    verifier: Option<IdTokenVerifier>,
}

impl AuthFlowOrchestrator {
    pub fn new(config: Arc<AppConfig>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        let verifier = config.verify_signature.then(|| {
            IdTokenVerifier::new(
                http.clone(),
                config.jwks_url.clone(),
                config.client_id.clone(),
                config.issuer.clone(),
            )
        });

        Ok(Self {
            config,
            http,
            verifier,
        })
    }

    pub async fn issue_state(&self, session: &dyn FlowSession) -> Result<String, FlowError> {
        let state = match &self.config.fixed_state {
            Some(fixed) => fixed.clone(),
            None => CsrfToken::new_random().secret().to_string(),
        };
        session.set(STATE_KEY, state.clone()).await?;
        Ok(state)
    }

    pub fn authorization_url(&self, state: &str) -> Result<String, FlowError> {
        let mut url = reqwest::Url::parse(&self.config.authorize_url())
            .map_err(|e| FlowError::Config(format!("invalid authorize URL: {}", e)))?;

        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("scope", &self.config.scopes)
            .append_pair("state", state);

        Ok(url.to_string())
    }

    pub async fn initiate(&self, session: &dyn FlowSession) -> Result<String, FlowError> {
        let state = self.issue_state(session).await?;
        self.authorization_url(&state)
    }

    pub async fn handle_callback(
        &self,
        session: &dyn FlowSession,
        params: CallbackParams,
    ) -> Result<CallbackOutcome, FlowError> {
        // The issued state is single use whatever the outcome.
        let issued = session.remove(STATE_KEY).await?;

        let state_ok = match (&issued, &params.state) {
            (Some(issued), Some(received)) => issued == received,
            _ => false,
        };
        if !state_ok {
            warn!(
                "OAuth callback rejected: state mismatch (issued: {}, received: {:?})",
                issued.is_some(),
                params.state
            );
            return Ok(CallbackOutcome::StateMismatch);
        }

        if let Some(error) = params.error {
            let description = params.error_description.unwrap_or_default();
            warn!("Identity provider returned error {}: {}", error, description);
            return Err(FlowError::ProviderDenied(if description.is_empty() {
                error
            } else {
                format!("{} ({})", error, description)
            }));
        }

        let code = params
            .code
            .filter(|c| !c.is_empty())
            .ok_or(FlowError::MissingCode)?;

        let tokens = self.exchange_code_for_tokens(session, &code).await?;
        let (claims, profile) = match self.claims_and_profile(&tokens).await {
            Ok(result) => result,
            Err(e) => {
                // A failed attempt must not leave usable tokens behind.
                session.remove(ID_TOKEN_KEY).await.ok();
                session.remove(ACCESS_TOKEN_KEY).await.ok();
                return Err(e);
            }
        };

        info!(
            "OAuth flow completed for subject {:?}",
            claims.get("sub").and_then(|v| v.as_str())
        );
        Ok(CallbackOutcome::Authenticated { claims, profile })
    }

    /// Nothing is stored unless the provider returned both tokens.
    pub async fn exchange_code_for_tokens(
        &self,
        session: &dyn FlowSession,
        code: &str,
    ) -> Result<TokenPair, FlowError> {
        debug!("Exchanging authorization code for tokens");

        let form = [
            ("grant_type", "authorization_code"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];

        let response = self
            .http
            .post(self.config.token_url())
            .header(ACCEPT, "application/json")
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to exchange token: {:?}", e);
                FlowError::TokenExchange(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error body".to_string());
            error!("Failed to exchange token (HTTP {}): {}", status, error_text);
            return Err(FlowError::TokenExchange(format!("HTTP {}", status)));
        }

        let token_data = response.json::<TokenResponse>().await.map_err(|e| {
            error!("Failed to parse token response: {:?}", e);
            FlowError::TokenExchange(format!("malformed token response: {}", e))
        })?;

        let tokens = token_data.into_pair().ok_or_else(|| {
            error!("Token response is missing id_token or access_token");
            FlowError::TokenExchange("response is missing id_token or access_token".to_string())
        })?;

        session.set(ID_TOKEN_KEY, tokens.id_token.clone()).await?;
        if let Err(e) = session
            .set(ACCESS_TOKEN_KEY, tokens.access_token.clone())
            .await
        {
            session.remove(ID_TOKEN_KEY).await.ok();
            return Err(e);
        }

        Ok(tokens)
    }

    async fn claims_and_profile(
        &self,
        tokens: &TokenPair,
    ) -> Result<(IdentityClaims, UserProfile), FlowError> {
        let claims = self.identity_claims(&tokens.id_token).await?;
        let profile = self.fetch_user_profile(&tokens.access_token).await?;
        Ok((claims, profile))
    }

    pub async fn identity_claims(&self, id_token: &str) -> Result<IdentityClaims, FlowError> {
        match &self.verifier {
            Some(verifier) => verifier.verify(id_token).await,
            None => decode_identity_claims(id_token),
        }
    }

    pub async fn fetch_user_profile(&self, access_token: &str) -> Result<UserProfile, FlowError> {
        let response = self
            .http
            .get(self.config.userinfo_url())
            .header(ACCEPT, "application/json")
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to fetch user info: {:?}", e);
                FlowError::ProfileFetch(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            error!("Failed to fetch user info (HTTP {})", status);
            return Err(FlowError::ProfileFetch(format!("HTTP {}", status)));
        }

        response.json::<UserProfile>().await.map_err(|e| {
            error!("Failed to parse user info: {:?}", e);
            FlowError::ProfileFetch(format!("malformed profile response: {}", e))
        })
    }

    pub async fn clear(&self, session: &dyn FlowSession) -> Result<(), FlowError> {
        for key in [STATE_KEY, ID_TOKEN_KEY, ACCESS_TOKEN_KEY] {
            session.remove(key).await?;
        }
        Ok(())
    }
}
