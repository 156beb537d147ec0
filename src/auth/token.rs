use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Lifetime of an issued bearer token, in seconds.
pub const TOKEN_TTL_SECS: i64 = 2 * 60 * 60;

/// Claim set carried by an admin bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies HS256 bearer tokens. Tokens are stateless; nothing
/// is persisted.
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: &str) -> Result<Self> {
        Self::with_ttl(secret, Duration::seconds(TOKEN_TTL_SECS))
    }

    pub fn with_ttl(secret: &str, ttl: Duration) -> Result<Self> {
        if secret.is_empty() {
            return Err(Error::Config("JWT secret must not be empty".into()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    pub fn issue(&self, username: &str, email: &str) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            username: username.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| Error::Config(format!("failed to sign token: {e}")))
    }

    /// Rejects expired, malformed, wrongly signed and non-HS256 tokens.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => Error::TokenExpired,
                _ => Error::InvalidToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_issue_and_verify() {
        let signer = TokenSigner::new(SECRET).unwrap();
        let token = signer.issue("admin", "admin@example.com").unwrap();

        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.username, "admin");
        assert_eq!(claims.email, "admin@example.com");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[test]
    fn test_altered_token_rejected() {
        let signer = TokenSigner::new(SECRET).unwrap();
        let token = signer.issue("admin", "admin@example.com").unwrap();

        let (rest, signature) = token.rsplit_once('.').unwrap();
        let replacement = if signature.starts_with('A') { "B" } else { "A" };
        let altered = format!("{rest}.{replacement}{}", &signature[1..]);

        assert!(matches!(signer.verify(&altered), Err(Error::InvalidToken)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let signer = TokenSigner::with_ttl(SECRET, Duration::seconds(-30)).unwrap();
        let token = signer.issue("admin", "admin@example.com").unwrap();

        assert!(matches!(signer.verify(&token), Err(Error::TokenExpired)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = TokenSigner::new("other-secret")
            .unwrap()
            .issue("admin", "admin@example.com")
            .unwrap();

        let signer = TokenSigner::new(SECRET).unwrap();
        assert!(matches!(signer.verify(&token), Err(Error::InvalidToken)));
    }

    #[test]
    fn test_wrong_algorithm_rejected() {
        let now = Utc::now();
        let claims = Claims {
            username: "admin".into(),
            email: "admin@example.com".into(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let signer = TokenSigner::new(SECRET).unwrap();
        assert!(matches!(signer.verify(&token), Err(Error::InvalidToken)));
    }

    #[test]
    fn test_malformed_token_rejected() {
        let signer = TokenSigner::new(SECRET).unwrap();

        assert!(matches!(signer.verify("not.a.jwt"), Err(Error::InvalidToken)));
        assert!(matches!(signer.verify(""), Err(Error::InvalidToken)));
    }

    #[test]
    fn test_empty_secret_refused() {
        assert!(matches!(TokenSigner::new(""), Err(Error::Config(_))));
    }
}
