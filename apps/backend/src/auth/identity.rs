//! Resolves verified token claims to a persisted user identity.

use uuid::Uuid;

use crate::auth::jwt::Claims;
use crate::AppError;

/// Extract the user id embedded in already-verified claims.
///
/// No store lookup happens here; whether the user still exists is detected by
/// the synchronizer when the record is loaded. A `sub` that is not a UUID can
/// only come from a token we never minted, so it is treated as unauthenticated.
pub fn resolve(claims: &Claims) -> Result<Uuid, AppError> {
    Uuid::parse_str(&claims.sub).map_err(|_| AppError::unauthorized_invalid_jwt())
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::resolve;
    use crate::auth::jwt::Claims;
    use crate::AppError;

    fn claims_with_sub(sub: &str) -> Claims {
        Claims {
            sub: sub.to_string(),
            email: "hiker@example.com".to_string(),
            iat: 0,
            exp: 0,
        }
    }

    #[test]
    fn resolves_uuid_subject() {
        let id = Uuid::new_v4();
        let resolved = resolve(&claims_with_sub(&id.to_string())).unwrap();
        assert_eq!(resolved, id);
    }

    #[test]
    fn rejects_non_uuid_subject() {
        match resolve(&claims_with_sub("not-a-uuid")) {
            Err(AppError::UnauthorizedInvalidJwt) => {}
            other => panic!("expected invalid-token error, got {other:?}"),
        }
    }
}
