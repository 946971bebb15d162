use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorMessage, HttpError};

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

/// Issues a token for `principal`. The service only verifies tokens; this
/// exists for operators and tests that stand in for the identity provider.
pub fn create_token(
    principal: &str,
    secret: &[u8],
    expires_in_minutes: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    if principal.is_empty() {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidSubject.into());
    }

    let now = Utc::now();
    let iat = now.timestamp() as usize;
    let exp = (now + Duration::minutes(expires_in_minutes)).timestamp() as usize;
    let claims = TokenClaims {
        sub: principal.to_string(),
        iat,
        exp,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
}

pub fn decode_token<T: Into<String>>(token: T, secret: &[u8]) -> Result<String, HttpError> {
    let decoded = decode::<TokenClaims>(
        &token.into(),
        &DecodingKey::from_secret(secret),
        &Validation::new(Algorithm::HS256),
    );

    match decoded {
        Ok(token) => Ok(token.claims.sub),
        Err(_) => Err(HttpError::unauthorized(ErrorMessage::InvalidToken.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_the_subject() {
        let token = create_token("principal-42", b"secret", 10).unwrap();
        assert_eq!(decode_token(token, b"secret").unwrap(), "principal-42");
    }

    #[test]
    fn rejects_wrong_secret_and_expired_tokens() {
        let token = create_token("principal-42", b"secret", 10).unwrap();
        assert!(decode_token(token, b"other").is_err());

        let expired = create_token("principal-42", b"secret", -10).unwrap();
        assert!(decode_token(expired, b"secret").is_err());
    }

    #[test]
    fn refuses_empty_subject() {
        assert!(create_token("", b"secret", 10).is_err());
    }
}
