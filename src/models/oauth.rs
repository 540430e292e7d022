use serde::Deserialize;
use serde_json::{Map, Value};

pub const STATE_KEY: &str = "oauth_state";
pub const ID_TOKEN_KEY: &str = "id_token";
pub const ACCESS_TOKEN_KEY: &str = "access_token";

pub type IdentityClaims = Map<String, Value>;

pub type UserProfile = Map<String, Value>;

#[derive(Debug, Deserialize, Default)]
pub struct CallbackParams {
    pub state: Option<String>,
    pub code: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenPair {
    pub id_token: String,
    pub access_token: String,
}

// Both tokens are optional so a missing one is an exchange error, not a serde error.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub id_token: Option<String>,
    pub access_token: Option<String>,
}

impl TokenResponse {
    pub fn into_pair(self) -> Option<TokenPair> {
        match (self.id_token, self.access_token) {
            (Some(id_token), Some(access_token))
                if !id_token.is_empty() && !access_token.is_empty() =>
            {
                Some(TokenPair {
                    id_token,
                    access_token,
                })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_pair_requires_both_tokens() {
        let response: TokenResponse =
            serde_json::from_str(r#"{"access_token": "abc123", "expires_in": 3600}"#).unwrap();
        assert!(response.into_pair().is_none());

        let response: TokenResponse =
            serde_json::from_str(r#"{"id_token": "a.b.c", "access_token": ""}"#).unwrap();
        assert!(response.into_pair().is_none());

        let response: TokenResponse =
            serde_json::from_str(r#"{"id_token": "a.b.c", "access_token": "abc123"}"#).unwrap();
        assert_eq!(
            response.into_pair(),
            Some(TokenPair {
                id_token: "a.b.c".to_string(),
                access_token: "abc123".to_string(),
            })
        );
    }
}
