use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Claims included in our backend-issued access tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the owning user's id (UUID, string-encoded)
    pub sub: String,
    pub email: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

/// Mint a HS256 JWT access token with a 15-minute TTL.
///
/// Token issuance itself (login, signup) lives outside this service; this
/// exists for the out-of-process issuer contract and for tests.
pub fn mint_access_token(
    sub: &str,
    email: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal("Failed to get current time".to_string()))?
        .as_secs() as i64;

    // 15 minutes expiration
    let exp = iat + 15 * 60;

    let claims = Claims {
        sub: sub.to_string(),
        email: email.to_string(),
        iat,
        exp,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verify a bearer token and return its claims.
///
/// Pure given the token and the clock: no store access, no side effects.
/// Expired, tampered, and otherwise malformed tokens all surface as 401s
/// with distinct codes.
pub fn verify_access_token(token: &str, security: &SecurityConfig) -> Result<Claims, AppError> {
    // Default Validation already checks exp; pin algorithm to configured algorithm.
    let validation = Validation::new(security.algorithm);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::unauthorized_expired_jwt(),
        _ => AppError::unauthorized_invalid_jwt(),
    })
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use super::{mint_access_token, verify_access_token};
    use crate::state::security_config::SecurityConfig;
    use crate::AppError;

    #[test]
    fn test_mint_and_verify_roundtrip() {
        let security = SecurityConfig::new("test_secret_key_for_testing_purposes_only".as_bytes());

        let sub = "4be544ba-b7f8-4f4f-9661-a54444705292";
        let email = "hiker@example.com";
        let now = SystemTime::now();

        let token = mint_access_token(sub, email, now, &security).unwrap();
        let claims = verify_access_token(&token, &security).unwrap();

        assert_eq!(claims.sub, sub);
        assert_eq!(claims.email, email);
        assert_eq!(
            claims.iat,
            now.duration_since(UNIX_EPOCH).unwrap().as_secs() as i64
        );
        assert_eq!(claims.exp, claims.iat + 15 * 60);
    }

    #[test]
    fn test_expired_token() {
        let security = SecurityConfig::new("test_secret_key_for_testing_purposes_only".as_bytes());

        // 20 minutes ago so the 15-minute token is expired
        let now = SystemTime::now() - Duration::from_secs(20 * 60);
        let token = mint_access_token("some-sub", "hiker@example.com", now, &security).unwrap();

        match verify_access_token(&token, &security) {
            Err(AppError::UnauthorizedExpiredJwt) => {}
            other => panic!("expected expired-token error, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_signature() {
        // Mint with secret A, verify with secret B
        let security_a = SecurityConfig::new("secret-A".as_bytes());
        let token =
            mint_access_token("some-sub", "hiker@example.com", SystemTime::now(), &security_a)
                .unwrap();

        let security_b = SecurityConfig::new("secret-B".as_bytes());
        match verify_access_token(&token, &security_b) {
            Err(AppError::UnauthorizedInvalidJwt) => {}
            other => panic!("expected invalid-token error, got {other:?}"),
        }
    }

    #[test]
    fn test_garbage_token() {
        let security = SecurityConfig::new("test_secret_key_for_testing_purposes_only".as_bytes());

        match verify_access_token("not-a-jwt", &security) {
            Err(AppError::UnauthorizedInvalidJwt) => {}
            other => panic!("expected invalid-token error, got {other:?}"),
        }
    }
}
