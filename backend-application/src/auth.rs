// Password hashing and JWT issuing

use anyhow::anyhow;
use backend_domain::{RuntimeConfig, TokenPair, User};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: u64,
    pub username: String,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

pub fn hash_password(config: &RuntimeConfig, password: &str) -> Result<String, AppError> {
    bcrypt::hash(password, config.bcrypt_cost)
        .map_err(|err| AppError::Internal(anyhow!("password hashing failed: {err}")))
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    bcrypt::verify(password, password_hash).unwrap_or(false)
}

fn issue_token(
    config: &RuntimeConfig,
    user: &User,
    kind: TokenKind,
    ttl: Duration,
) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        kind,
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
        jti: uuid::Uuid::new_v4().to_string(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|err| AppError::Internal(anyhow!("token encoding failed: {err}")))
}

pub fn issue_access_token(config: &RuntimeConfig, user: &User) -> Result<String, AppError> {
    issue_token(
        config,
        user,
        TokenKind::Access,
        Duration::minutes(config.jwt_ttl_minutes as i64),
    )
}

pub fn issue_tokens(config: &RuntimeConfig, user: &User) -> Result<TokenPair, AppError> {
    Ok(TokenPair {
        access: issue_access_token(config, user)?,
        refresh: issue_token(
            config,
            user,
            TokenKind::Refresh,
            Duration::days(config.refresh_ttl_days as i64),
        )?,
    })
}

fn decode_token(config: &RuntimeConfig, token: &str, kind: TokenKind) -> Result<Claims, AppError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized)?;
    if data.claims.kind != kind {
        return Err(AppError::Unauthorized);
    }
    Ok(data.claims)
}

/// Decodes and checks an access token. Refresh tokens are rejected.
pub fn decode_access_token(config: &RuntimeConfig, token: &str) -> Result<Claims, AppError> {
    decode_token(config, token, TokenKind::Access)
}

pub fn decode_refresh_token(config: &RuntimeConfig, token: &str) -> Result<Claims, AppError> {
    decode_token(config, token, TokenKind::Refresh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_domain::Agreements;

    fn user() -> User {
        User {
            id: 42,
            username: "resident".to_string(),
            password_hash: String::new(),
            name: "주민".to_string(),
            phone_number: "+821012345678".to_string(),
            birth_date: None,
            agreements: Agreements::default(),
            is_admin: false,
            home_location_id: None,
            interested_location_ids: vec![],
            interest_subcategory_ids: vec![],
            created_at: Utc::now(),
        }
    }

    fn test_config() -> RuntimeConfig {
        RuntimeConfig {
            jwt_secret: "unit-test-secret".to_string(),
            bcrypt_cost: 4,
            ..RuntimeConfig::default()
        }
    }

    #[test]
    fn access_token_round_trips_subject() {
        let config = test_config();
        let tokens = issue_tokens(&config, &user()).expect("tokens");
        let claims = decode_access_token(&config, &tokens.access).expect("claims");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.username, "resident");
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let config = test_config();
        let tokens = issue_tokens(&config, &user()).expect("tokens");
        assert!(matches!(
            decode_access_token(&config, &tokens.refresh),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            decode_refresh_token(&config, &tokens.access),
            Err(AppError::Unauthorized)
        ));
        assert_eq!(
            decode_refresh_token(&config, &tokens.refresh).expect("refresh").sub,
            42
        );
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let config = test_config();
        let tokens = issue_tokens(&config, &user()).expect("tokens");
        let other = RuntimeConfig {
            jwt_secret: "another-secret".to_string(),
            ..test_config()
        };
        assert!(decode_access_token(&other, &tokens.access).is_err());
    }

    #[test]
    fn password_hash_verifies() {
        let config = test_config();
        let hash = hash_password(&config, "password123").expect("hash");
        assert!(verify_password("password123", &hash));
        assert!(!verify_password("password124", &hash));
        assert!(!verify_password("password123", "not-a-hash"));
    }
}
