use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::UserRole;

use super::Caller;

pub const TOKEN_PREFIX: &str = "Bearer ";
const SUBJECT: &str = "bank";
const VALIDITY_DAYS: i64 = 7;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("authorization header is not a bearer credential")]
    NotBearer,
    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub id: i64,
    pub role: UserRole,
    pub exp: i64,
}

/// Issues and checks HS512 bearer tokens. Nothing is stored server-side;
/// every request proves its identity again.
#[derive(Clone)]
pub struct TokenVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.sub = Some(SUBJECT.to_owned());
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn issue(&self, caller: &Caller) -> Result<String, TokenError> {
        let claims = Claims {
            sub: SUBJECT.to_owned(),
            id: caller.user_id(),
            role: caller.role(),
            exp: (Utc::now() + Duration::days(VALIDITY_DAYS)).timestamp(),
        };

        Ok(encode(&Header::new(Algorithm::HS512), &claims, &self.encoding)?)
    }

    pub fn verify(&self, token: &str) -> Result<Caller, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(Caller::new(data.claims.id, data.claims.role))
    }

    /// Verifies the value of an `Authorization` header.
    pub fn verify_header(&self, header: &str) -> Result<Caller, TokenError> {
        let token = header
            .strip_prefix(TOKEN_PREFIX)
            .ok_or(TokenError::NotBearer)?;
        self.verify(token.trim())
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-test-secret-test-secret";

    #[test]
    fn issued_token_verifies_to_same_caller() {
        let verifier = TokenVerifier::new(SECRET);
        let caller = Caller::new(3, UserRole::Admin);

        let token = verifier.issue(&caller).unwrap();

        assert_eq!(verifier.verify(&token).unwrap(), caller);
        assert_eq!(
            verifier.verify_header(&format!("Bearer {token}")).unwrap(),
            caller
        );
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = TokenVerifier::new(b"another-secret-another-secret")
            .issue(&Caller::new(1, UserRole::Customer))
            .unwrap();

        assert!(matches!(
            TokenVerifier::new(SECRET).verify(&token),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = Claims {
            sub: SUBJECT.to_owned(),
            id: 1,
            role: UserRole::Customer,
            exp: (Utc::now() - Duration::days(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(TokenVerifier::new(SECRET).verify(&token).is_err());
    }

    #[test]
    fn non_bearer_header_is_rejected() {
        assert!(matches!(
            TokenVerifier::new(SECRET).verify_header("Basic dXNlcjpwYXNz"),
            Err(TokenError::NotBearer)
        ));
    }
}
