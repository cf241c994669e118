use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::Claims;
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use uuid::Uuid;

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

/// Token validity in seconds defaults to 24 hours (see Config). There is no
/// refresh flow; callers re-authenticate after expiry.
pub fn issue_token(
    user_id: &str,
    secret: &str,
    ttl: usize,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: user_id.to_owned(),
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

#[derive(Debug, PartialEq, Eq)]
pub enum TokenError {
    /// Signature was fine but the expiry has passed.
    Expired,
    /// Anything else: malformed, forged, wrong algorithm.
    Invalid,
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::default();
    // No leeway: expiry is exact so the gate can report it precisely.
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn issued_token_verifies_to_the_same_subject() {
        let token = issue_token("student-1", SECRET, 3600).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "student-1");
    }

    #[test]
    fn expired_token_is_reported_as_expired_not_invalid() {
        let claims = Claims {
            sub: "student-1".into(),
            exp: now() - 120,
            jti: "test".into(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(verify_token(&token, SECRET), Err(TokenError::Expired));
    }

    #[test]
    fn tampered_token_is_invalid() {
        let token = issue_token("student-1", SECRET, 3600).unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        assert_eq!(verify_token(&tampered, SECRET), Err(TokenError::Invalid));
        assert_eq!(verify_token("garbage", SECRET), Err(TokenError::Invalid));
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let token = issue_token("student-1", SECRET, 3600).unwrap();
        assert_eq!(
            verify_token(&token, "other-secret"),
            Err(TokenError::Invalid)
        );
    }
}
