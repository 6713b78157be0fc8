//! Server-issued arithmetic challenges.
//!
//! The operands are chosen by the server and sealed in a short-lived HS256
//! token. When a submission carries such a token, its operands are the only
//! ones trusted.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ContactConfig;

/// Smallest operand handed out.
const MIN_OPERAND: i64 = 1;

/// Largest operand handed out.
const MAX_OPERAND: i64 = 9;

/// Challenge token errors.
#[derive(Error, Debug)]
pub enum ChallengeError {
    #[error("failed to sign challenge: {0}")]
    Encode(String),

    #[error("invalid challenge token: {0}")]
    Invalid(String),
}

/// Claims sealed in a challenge token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeClaims {
    pub a: i64,
    pub b: i64,
    pub iat: u64,
    pub exp: u64,
    pub jti: String,
}

/// A challenge as returned to the browser.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedChallenge {
    pub a: i64,
    pub b: i64,
    pub token: String,
    /// Seconds until the token expires.
    pub expires_in: u64,
}

/// Issues and verifies signed challenges.
pub struct ChallengeIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl ChallengeIssuer {
    /// Create an issuer signing with the given secret.
    pub fn new(secret: &[u8], ttl_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_secs,
        }
    }

    /// Create an issuer with a random secret, valid for this process only.
    pub fn with_random_secret(ttl_secs: u64) -> Self {
        let secret: [u8; 32] = rand::random();
        Self::new(&secret, ttl_secs)
    }

    /// Create an issuer from configuration.
    ///
    /// An empty secret falls back to a random one.
    pub fn from_config(config: &ContactConfig) -> Self {
        if config.challenge_secret.is_empty() {
            tracing::info!("No challenge secret configured, using a per-process random secret");
            Self::with_random_secret(config.challenge_ttl_secs)
        } else {
            Self::new(
                config.challenge_secret.as_bytes(),
                config.challenge_ttl_secs,
            )
        }
    }

    /// Token lifetime in seconds.
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Issue a fresh challenge.
    pub fn issue(&self) -> Result<IssuedChallenge, ChallengeError> {
        let mut rng = rand::rng();
        let a = rng.random_range(MIN_OPERAND..=MAX_OPERAND);
        let b = rng.random_range(MIN_OPERAND..=MAX_OPERAND);

        let now = chrono::Utc::now().timestamp() as u64;
        let claims = ChallengeClaims {
            a,
            b,
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ChallengeError::Encode(e.to_string()))?;

        Ok(IssuedChallenge {
            a,
            b,
            token,
            expires_in: self.ttl_secs,
        })
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<ChallengeClaims, ChallengeError> {
        decode::<ChallengeClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| ChallengeError::Invalid(e.to_string()))
    }
}
