use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::flow::AuthFlowOrchestrator;

const DEFAULT_REDIRECT_URI: &str = "http://0.0.0.0:10060/oauth";
const DEFAULT_LISTEN_PORT: u16 = 10060;
const DEFAULT_PROVIDER_BASE_URL: &str = "https://webexapis.com";
const DEFAULT_SCOPES: &str = "openid email profile";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} not found")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone)]
pub struct AppConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub listen_port: u16,
    pub provider_base_url: String,
    pub scopes: String,
    // Unset means a fresh state per login.
    pub fixed_state: Option<String>,
    pub verify_signature: bool,
    pub jwks_url: String,
    pub issuer: Option<String>,
    pub http_timeout: Duration,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("listen_port", &self.listen_port)
            .field("provider_base_url", &self.provider_base_url)
            .field("scopes", &self.scopes)
            .field("fixed_state", &self.fixed_state)
            .field("verify_signature", &self.verify_signature)
            .field("jwks_url", &self.jwks_url)
            .field("issuer", &self.issuer)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        use dotenvy::dotenv;
        use std::env;

        dotenv().ok();

        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let client_id = get("WEBEX_CLIENT_ID").ok_or(ConfigError::Missing("WEBEX_CLIENT_ID"))?;
        let client_secret =
            get("WEBEX_CLIENT_SECRET").ok_or(ConfigError::Missing("WEBEX_CLIENT_SECRET"))?;
        let redirect_uri = get("REDIRECT_URI").unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string());

        let listen_port = match get("LISTEN_PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "LISTEN_PORT",
                value,
            })?,
            None => DEFAULT_LISTEN_PORT,
        };

        let provider_base_url = get("PROVIDER_BASE_URL")
            .unwrap_or_else(|| DEFAULT_PROVIDER_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let scopes = get("OAUTH_SCOPES").unwrap_or_else(|| DEFAULT_SCOPES.to_string());
        let fixed_state = get("OAUTH_FIXED_STATE");

        let verify_signature = match get("VERIFY_ID_TOKEN_SIGNATURE") {
            Some(value) => parse_bool(&value).ok_or(ConfigError::Invalid {
                name: "VERIFY_ID_TOKEN_SIGNATURE",
                value,
            })?,
            None => false,
        };
        let jwks_url =
            get("JWKS_URL").unwrap_or_else(|| format!("{}/v1/verification", provider_base_url));
        let issuer = get("ID_TOKEN_ISSUER");

        let timeout_secs = match get("HTTP_TIMEOUT_SECS") {
            Some(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "HTTP_TIMEOUT_SECS",
                        value,
                    });
                }
            },
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri,
            listen_port,
            provider_base_url,
            scopes,
            fixed_state,
            verify_signature,
            jwks_url,
            issuer,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn authorize_url(&self) -> String {
        format!("{}/v1/authorize", self.provider_base_url)
    }

    pub fn token_url(&self) -> String {
        format!("{}/v1/access_token", self.provider_base_url)
    }

    pub fn userinfo_url(&self) -> String {
        format!("{}/v1/userinfo", self.provider_base_url)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub orchestrator: Arc<AuthFlowOrchestrator>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, reqwest::Error> {
        let config = Arc::new(config);
        let orchestrator = Arc::new(AuthFlowOrchestrator::new(config.clone())?);
        Ok(Self {
            config,
            orchestrator,
        })
    }
}
