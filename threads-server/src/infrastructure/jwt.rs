use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum JwtError {
    #[error("token encode failed")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("token decode/validation failed")]
    Decode(#[source] jsonwebtoken::errors::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct Claims {
    pub(crate) user_id: i64,
    pub(crate) username: String,
    pub(crate) iat: i64,
    pub(crate) exp: i64,
}

#[derive(Clone)]
pub(crate) struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_seconds: i64,
}

impl JwtService {
    const DEFAULT_TTL_SECONDS: i64 = 15 * 24 * 60 * 60;
    const LEEWAY_SECONDS: u64 = 10;

    pub(crate) fn new(secret: &str, ttl_seconds: i64) -> Self {
        let ttl_seconds = if ttl_seconds > 0 {
            ttl_seconds
        } else {
            Self::DEFAULT_TTL_SECONDS
        };

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_seconds,
        }
    }

    pub(crate) fn issue(&self, user_id: i64, username: &str) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            user_id,
            username: username.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.ttl_seconds)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(JwtError::Encode)
    }

    pub(crate) fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = Self::LEEWAY_SECONDS;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(JwtError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

    use super::{Claims, JwtService};

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn issued_token_verifies_with_same_secret() {
        let jwt = JwtService::new(SECRET, 3600);
        let token = jwt.issue(7, "ada").expect("token must be issued");

        let claims = jwt.verify(&token).expect("token must verify");
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.username, "ada");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = JwtService::new(SECRET, 3600)
            .issue(7, "ada")
            .expect("token must be issued");

        let other = JwtService::new("fedcba9876543210fedcba9876543210", 3600);
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let past = Utc::now() - Duration::hours(2);
        let claims = Claims {
            user_id: 7,
            username: "ada".to_string(),
            iat: past.timestamp(),
            exp: (past + Duration::minutes(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("token must encode");

        assert!(JwtService::new(SECRET, 3600).verify(&token).is_err());
    }
}
