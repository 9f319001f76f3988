use jsonwebtoken::DecodingKey;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Deserialize)]
struct JwksResponse {
    keys: Vec<Jwk>,
}

/// One signing key as published in Google's JWKS document
#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    kty: String,
    #[serde(rename = "use")]
    key_use: Option<String>,
    alg: Option<String>,
    n: String,
    e: String,
}

impl Jwk {
    /// Google signs ID tokens with RS256; skip anything else
    fn is_rs256_signing_key(&self) -> bool {
        self.kty == "RSA"
            && self.key_use.as_deref().unwrap_or("sig") == "sig"
            && self.alg.as_deref().unwrap_or("RS256") == "RS256"
    }
}

struct JwksCache {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Instant,
}

/// Fetches and caches the RSA signing keys Google publishes at
/// https://www.googleapis.com/oauth2/v3/certs. Google rotates these
/// regularly, so a stale cache is refreshed on the next lookup.
pub struct JwksClient {
    jwks_url: String,
    client: reqwest::Client,
    cache: Arc<RwLock<Option<JwksCache>>>,
    cache_ttl: Duration,
}

impl JwksClient {
    pub fn new(jwks_url: &str, cache_ttl: Duration) -> Self {
        Self {
            jwks_url: jwks_url.to_string(),
            client: reqwest::Client::new(),
            cache: Arc::new(RwLock::new(None)),
            cache_ttl,
        }
    }

    /// Look up the decoding key for a token's `kid` header, refreshing
    /// the cached key set when it is missing or expired.
    pub async fn get_key(&self, kid: &str) -> Result<DecodingKey, JwksError> {
        if let Some(key) = self.cached_key(kid).await {
            return Ok(key);
        }

        // An unknown kid also forces a refresh: a freshly issued token
        // may be signed with a key we have not seen yet.
        self.refresh().await?;

        self.cached_key(kid)
            .await
            .ok_or_else(|| JwksError::KeyNotFound(kid.to_string()))
    }

    async fn cached_key(&self, kid: &str) -> Option<DecodingKey> {
        let cache = self.cache.read().await;
        let cached = cache.as_ref()?;
        if cached.fetched_at.elapsed() >= self.cache_ttl {
            return None;
        }
        cached.keys.get(kid).cloned()
    }

    async fn refresh(&self) -> Result<(), JwksError> {
        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| JwksError::FetchError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(JwksError::FetchError(format!(
                "Failed to fetch JWKS: HTTP {}",
                response.status()
            )));
        }

        let jwks: JwksResponse = response
            .json()
            .await
            .map_err(|e| JwksError::ParseError(e.to_string()))?;

        let keys = build_key_map(jwks)?;

        let mut cache = self.cache.write().await;
        *cache = Some(JwksCache {
            keys,
            fetched_at: Instant::now(),
        });

        Ok(())
    }
}

fn build_key_map(jwks: JwksResponse) -> Result<HashMap<String, DecodingKey>, JwksError> {
    let mut keys = HashMap::new();

    for jwk in jwks.keys {
        if !jwk.is_rs256_signing_key() {
            continue;
        }
        let decoding_key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
            .map_err(|e| JwksError::KeyConversionError(e.to_string()))?;
        keys.insert(jwk.kid, decoding_key);
    }

    Ok(keys)
}

#[derive(Debug, thiserror::Error)]
pub enum JwksError {
    #[error("Failed to fetch JWKS: {0}")]
    FetchError(String),

    #[error("Failed to parse JWKS: {0}")]
    ParseError(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Failed to convert key: {0}")]
    KeyConversionError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_map_keeps_only_rs256_signing_keys() {
        let raw = r#"{
            "keys": [
                {"kid": "a1", "kty": "RSA", "use": "sig", "alg": "RS256", "n": "eHh4", "e": "AQAB"},
                {"kid": "b2", "kty": "EC", "use": "sig", "alg": "ES256", "n": "eHh4", "e": "AQAB"},
                {"kid": "c3", "kty": "RSA", "use": "enc", "alg": "RS256", "n": "eHh4", "e": "AQAB"}
            ]
        }"#;

        let jwks: JwksResponse = serde_json::from_str(raw).unwrap();
        let keys = build_key_map(jwks).unwrap();

        assert_eq!(keys.len(), 1);
        assert!(keys.contains_key("a1"));
    }

    #[test]
    fn test_key_map_accepts_keys_without_use_or_alg() {
        // Some JWKS documents omit the optional fields entirely
        let raw = r#"{"keys": [{"kid": "a1", "kty": "RSA", "n": "eHh4", "e": "AQAB"}]}"#;

        let jwks: JwksResponse = serde_json::from_str(raw).unwrap();
        let keys = build_key_map(jwks).unwrap();

        assert!(keys.contains_key("a1"));
    }
}
