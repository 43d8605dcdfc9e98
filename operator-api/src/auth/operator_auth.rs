//! Operator JWT authentication

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use shared::error::AppError;

use super::ability::Principal;
use crate::state::AppState;

/// JWT claims for operator authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct OperatorClaims {
    /// User ID
    pub sub: String,
    /// Granted ability names
    #[serde(default)]
    pub abilities: Vec<String>,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Verify a bearer token and build the caller's principal
pub fn verify_token(token: &str, secret: &str) -> Result<Principal, AppError> {
    let token_data = jsonwebtoken::decode::<OperatorClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        match e.kind() {
            ErrorKind::ExpiredSignature => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        }
    })?;

    let user_id = token_data
        .claims
        .sub
        .parse::<i64>()
        .map_err(|_| AppError::invalid_token("Invalid subject"))?;

    Ok(Principal::from_claims(user_id, &token_data.claims.abilities))
}

/// Middleware that extracts and verifies the operator JWT from the Authorization header
pub async fn operator_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(AppError::not_authenticated)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::invalid_token("Invalid Authorization format"))?;

    let principal = verify_token(token, &state.jwt_secret)?;
    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

#[cfg(test)]
const JWT_EXPIRY_HOURS: i64 = 24;

/// Create a JWT token for a user
#[cfg(test)]
pub fn create_token(
    user_id: i64,
    abilities: &[&str],
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    use jsonwebtoken::{EncodingKey, Header};

    let now = chrono::Utc::now();
    let claims = OperatorClaims {
        sub: user_id.to_string(),
        abilities: abilities.iter().map(|a| a.to_string()).collect(),
        exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Ability;
    use shared::error::ErrorCode;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_verify_round_trip() {
        let token = create_token(7, &["operator", "stats"], SECRET).unwrap();
        let principal = verify_token(&token, SECRET).unwrap();

        assert_eq!(principal.user_id, 7);
        assert!(principal.can(Ability::Operator));
        assert!(principal.can(Ability::Stats));
        assert!(!principal.can(Ability::Cook));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = create_token(7, &["operator"], SECRET).unwrap();
        let err = verify_token(&token, "other-secret").unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        use jsonwebtoken::{EncodingKey, Header};

        let now = chrono::Utc::now().timestamp();
        let claims = OperatorClaims {
            sub: "7".into(),
            abilities: vec!["operator".into()],
            exp: (now - 3600) as usize,
            iat: (now - 7200) as usize,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let err = verify_token(&token, SECRET).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenExpired);
    }
}
