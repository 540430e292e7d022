//! Identity token handling.
//!
//! [`decode_identity_claims`] only base64-decodes the payload segment. The
//! result is fit for display, not for authentication decisions; use
//! [`IdTokenVerifier`] when the provider's signature has to be checked.

use std::str::FromStr;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{
    Algorithm, DecodingKey, Validation, decode, decode_header,
    jwk::{Jwk, JwkSet},
};
use serde_json::Value;
use tracing::debug;

use crate::models::FlowError;
use crate::models::oauth::IdentityClaims;

/// Decodes the payload of a compact JWS without checking its signature.
pub fn decode_identity_claims(token: &str) -> Result<IdentityClaims, FlowError> {
    let mut segments = token.trim().split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(FlowError::ClaimDecode(
            "token must have three dot-separated segments".to_string(),
        ));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| FlowError::ClaimDecode(format!("payload is not base64url: {}", e)))?;

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(claims)) => Ok(claims),
        Ok(_) => Err(FlowError::ClaimDecode(
            "payload is not a JSON object".to_string(),
        )),
        Err(e) => Err(FlowError::ClaimDecode(format!(
            "payload is not valid JSON: {}",
            e
        ))),
    }
}

/// Checks identity token signatures against the provider's published keys.
pub struct IdTokenVerifier {
    http: reqwest::Client,
    jwks_url: String,
    audience: String,
    issuer: Option<String>,
}

impl IdTokenVerifier {
    pub fn new(
        http: reqwest::Client,
        jwks_url: String,
        audience: String,
        issuer: Option<String>,
    ) -> Self {
        Self {
            http,
            jwks_url,
            audience,
            issuer,
        }
    }

    async fn fetch_keys(&self) -> Result<JwkSet, FlowError> {
        let response = self
            .http
            .get(&self.jwks_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FlowError::ClaimDecode(format!("failed to fetch signing keys: {}", e)))?;

        if !response.status().is_success() {
            return Err(FlowError::ClaimDecode(format!(
                "signing key endpoint returned HTTP {}",
                response.status()
            )));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| FlowError::ClaimDecode(format!("invalid signing key set: {}", e)))
    }

    pub async fn verify(&self, token: &str) -> Result<IdentityClaims, FlowError> {
        let header = decode_header(token)
            .map_err(|e| FlowError::ClaimDecode(format!("invalid token header: {}", e)))?;
        let keys = self.fetch_keys().await?;

        let jwk = match header.kid.as_deref() {
            Some(kid) => keys.find(kid),
            None => keys.keys.first(),
        }
        .ok_or_else(|| FlowError::ClaimDecode("no matching signing key".to_string()))?;
        debug!("Verifying identity token with key {:?}", header.kid);

        // A key that names its algorithm pins it; the token header cannot pick another.
        let algorithm = key_algorithm(jwk)?.unwrap_or(header.alg);
        if algorithm != header.alg {
            return Err(FlowError::ClaimDecode(format!(
                "token algorithm {:?} does not match signing key algorithm {:?}",
                header.alg, algorithm
            )));
        }

        let key = DecodingKey::from_jwk(jwk)
            .map_err(|e| FlowError::ClaimDecode(format!("unusable signing key: {}", e)))?;
        let mut validation = Validation::new(algorithm);
        validation.set_audience(&[self.audience.as_str()]);
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer.as_str()]);
        }

        decode::<IdentityClaims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| FlowError::ClaimDecode(format!("signature check failed: {}", e)))
    }
}

fn key_algorithm(jwk: &Jwk) -> Result<Option<Algorithm>, FlowError> {
    let Some(key_algorithm) = jwk.common.key_algorithm.as_ref() else {
        return Ok(None);
    };
    let name = serde_json::to_value(key_algorithm)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default();

    Algorithm::from_str(&name).map(Some).map_err(|_| {
        FlowError::ClaimDecode(format!("signing key algorithm {} is not a signature algorithm", name))
    })
}
