//! JWT implementation of the token maker (HS256).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::MIN_TOKEN_SECRET_SIZE,
    models::user::UserRole,
    token::{TokenError, TokenMaker, TokenPayload},
};

/// Wire-format claims. `exp`/`iat` are Unix timestamps as JWT requires;
/// the payload round-trips through this struct.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    jti: Uuid,
    sub: String,
    role: UserRole,
    iat: i64,
    exp: i64,
}

/// HS256 token maker.
pub struct JwtTokenMaker {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtTokenMaker {
    /// Build a maker from a shared secret.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidKeySize`] if the secret is shorter
    /// than 32 bytes.
    pub fn new(secret: &str) -> Result<Self, TokenError> {
        if secret.len() < MIN_TOKEN_SECRET_SIZE {
            return Err(TokenError::InvalidKeySize);
        }

        // Expired means expired: no clock-skew grace period
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }
}

impl TokenMaker for JwtTokenMaker {
    fn create_token(
        &self,
        username: &str,
        role: UserRole,
        duration: Duration,
    ) -> Result<(String, TokenPayload), TokenError> {
        let payload = TokenPayload::new(username.to_string(), role, duration);

        let claims = Claims {
            jti: payload.id,
            sub: payload.username.clone(),
            role: payload.role,
            iat: payload.issued_at.timestamp(),
            exp: payload.expired_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| TokenError::Invalid)?;

        Ok((token, payload))
    }

    fn verify_token(&self, token: &str) -> Result<TokenPayload, TokenError> {
        let data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|err| {
                match err.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Invalid,
                }
            })?;

        let claims = data.claims;
        Ok(TokenPayload {
            id: claims.jti,
            username: claims.sub,
            role: claims.role,
            issued_at: timestamp_to_datetime(claims.iat),
            expired_at: timestamp_to_datetime(claims.exp),
        })
    }
}

fn timestamp_to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn create_and_verify_round_trips() {
        let maker = JwtTokenMaker::new(SECRET).unwrap();

        let (token, payload) = maker
            .create_token("alice_01", UserRole::Depositor, Duration::minutes(15))
            .unwrap();
        assert!(!token.is_empty());

        let verified = maker.verify_token(&token).unwrap();
        assert_eq!(verified.id, payload.id);
        assert_eq!(verified.username, "alice_01");
        assert_eq!(verified.role, UserRole::Depositor);
        assert_eq!(
            verified.expired_at.timestamp(),
            payload.expired_at.timestamp()
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let maker = JwtTokenMaker::new(SECRET).unwrap();

        let (token, _) = maker
            .create_token("alice_01", UserRole::Depositor, Duration::minutes(-1))
            .unwrap();

        assert!(matches!(
            maker.verify_token(&token),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn forged_token_is_rejected() {
        let maker = JwtTokenMaker::new(SECRET).unwrap();
        let other = JwtTokenMaker::new("another-secret-of-32-bytes-here!").unwrap();

        let (token, _) = other
            .create_token("alice_01", UserRole::Banker, Duration::minutes(15))
            .unwrap();

        assert!(matches!(
            maker.verify_token(&token),
            Err(TokenError::Invalid)
        ));
        assert!(matches!(
            maker.verify_token("garbage"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn short_secret_is_rejected() {
        assert!(matches!(
            JwtTokenMaker::new("too-short"),
            Err(TokenError::InvalidKeySize)
        ));
    }
}
