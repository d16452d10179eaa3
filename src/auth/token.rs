use std::collections::HashSet;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::{AuthConfig, KeyPairConfig};

/// Asymmetric algorithms accepted for signing keypairs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningAlgorithm {
    Rs256,
    EdDsa,
}

impl SigningAlgorithm {
    fn as_jwt(self) -> Algorithm {
        match self {
            SigningAlgorithm::Rs256 => Algorithm::RS256,
            SigningAlgorithm::EdDsa => Algorithm::EdDSA,
        }
    }
}

impl FromStr for SigningAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RS256" => Ok(SigningAlgorithm::Rs256),
            "EDDSA" | "ED25519" => Ok(SigningAlgorithm::EdDsa),
            other => Err(format!("unsupported signing algorithm '{}'", other)),
        }
    }
}

/// Claims carried by both access and refresh tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is not valid yet")]
    NotYetValid,

    #[error("could not sign token: {0}")]
    Signing(String),

    #[error("invalid key material: {0}")]
    InvalidKey(String),
}

/// One signing keypair: private half issues, public half validates.
pub struct TokenKeys {
    algorithm: SigningAlgorithm,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn from_pem(
        algorithm: SigningAlgorithm,
        private_pem: &[u8],
        public_pem: &[u8],
    ) -> Result<Self, TokenError> {
        let key_err = |e: jsonwebtoken::errors::Error| TokenError::InvalidKey(e.to_string());

        let (encoding, decoding) = match algorithm {
            SigningAlgorithm::Rs256 => (
                EncodingKey::from_rsa_pem(private_pem).map_err(key_err)?,
                DecodingKey::from_rsa_pem(public_pem).map_err(key_err)?,
            ),
            SigningAlgorithm::EdDsa => (
                EncodingKey::from_ed_pem(private_pem).map_err(key_err)?,
                DecodingKey::from_ed_pem(public_pem).map_err(key_err)?,
            ),
        };

        Ok(Self {
            algorithm,
            encoding,
            decoding,
        })
    }

    pub fn from_config(algorithm: SigningAlgorithm, pair: &KeyPairConfig) -> Result<Self, TokenError> {
        Self::from_pem(
            algorithm,
            pair.private_key.as_bytes(),
            pair.public_key.as_bytes(),
        )
    }

    /// Sign a token for `subject` valid for `ttl` from now.
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String, TokenError> {
        self.issue_at(subject, ttl, Utc::now())
    }

    pub fn issue_at(
        &self,
        subject: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let iat = now.timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            iat,
            nbf: iat,
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(self.algorithm.as_jwt()), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature and time window, returning the subject.
    pub fn validate(&self, token: &str) -> Result<String, TokenError> {
        self.validate_at(token, Utc::now()).map(|claims| claims.sub)
    }

    /// A token is valid for `iat <= now < exp`.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm.as_jwt());
        // Time checks are done below against the supplied clock, with no leeway.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.required_spec_claims = HashSet::from(["exp".to_string(), "sub".to_string()]);

        let data = decode::<Claims>(token.trim(), &self.decoding, &validation)
            .map_err(|e| classify(e.kind()))?;
        let claims = data.claims;

        let now = now.timestamp();
        if now < claims.iat || now < claims.nbf {
            return Err(TokenError::NotYetValid);
        }
        if now >= claims.exp {
            return Err(TokenError::Expired);
        }
        if claims.sub.is_empty() {
            return Err(TokenError::Malformed);
        }

        debug!("Validated token for subject {}", claims.sub);
        Ok(claims)
    }
}

fn classify(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::ImmatureSignature => TokenError::NotYetValid,
        _ => TokenError::Malformed,
    }
}

/// Access and refresh keypairs with their lifetimes.
///
/// The two kinds never share keys, so a refresh token can not pass as an
/// access token or the other way round.
pub struct TokenService {
    access: TokenKeys,
    refresh: TokenKeys,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(
        access: TokenKeys,
        refresh: TokenKeys,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            access,
            refresh,
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_config(auth: &AuthConfig) -> Result<Self, TokenError> {
        Ok(Self::new(
            TokenKeys::from_config(auth.algorithm, &auth.access)?,
            TokenKeys::from_config(auth.algorithm, &auth.refresh)?,
            Duration::minutes(auth.access_token_expires_in),
            Duration::minutes(auth.refresh_token_expires_in),
        ))
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    pub fn issue_access(&self, subject: &str) -> Result<String, TokenError> {
        self.access.issue(subject, self.access_ttl)
    }

    pub fn issue_refresh(&self, subject: &str) -> Result<String, TokenError> {
        self.refresh.issue(subject, self.refresh_ttl)
    }

    pub fn validate_access(&self, token: &str) -> Result<String, TokenError> {
        self.access.validate(token)
    }

    pub fn validate_refresh(&self, token: &str) -> Result<String, TokenError> {
        self.refresh.validate(token)
    }

    pub fn access_keys(&self) -> &TokenKeys {
        &self.access
    }

    pub fn refresh_keys(&self) -> &TokenKeys {
        &self.refresh
    }
}
