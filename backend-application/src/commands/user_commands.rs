use std::time::Duration;

use tracing::{error, info, warn};

use crate::auth::{
    decode_refresh_token, hash_password, issue_access_token, issue_tokens, verify_password,
};
use crate::queries::user_queries::{build_profile, require_user};
use crate::{AppError, AppState};
use backend_domain::utils::normalize_phone_number;
use backend_domain::{
    AccessToken, HomeLocationUpdate, InterestedLocationsUpdate, InterestsUpdate, LoginRequest, NewUser,
    SignupRequest, SmsSendRequest, SmsVerifyRequest, TokenPair, TokenRefreshRequest, User, UserProfile,
};

fn phone_from(raw: Option<&str>) -> Result<String, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::BadRequest("전화번호를 입력해주세요.".to_string()))?;
    normalize_phone_number(raw)
        .ok_or_else(|| AppError::BadRequest("올바른 전화번호 형식이 아닙니다.".to_string()))
}

/// Six decimal digits from a fresh v4 uuid.
pub fn generate_verification_code() -> String {
    format!("{:06}", uuid::Uuid::new_v4().as_u128() % 1_000_000)
}

pub async fn send_sms_code(state: &AppState, payload: SmsSendRequest) -> Result<(), AppError> {
    let phone_number = phone_from(payload.phone_number.as_deref())?;
    let code = generate_verification_code();
    state
        .verification_store
        .issue(
            &phone_number,
            &code,
            Duration::from_secs(state.config.sms_code_ttl_seconds),
        )
        .await;
    state
        .sms_sender
        .send_code(&phone_number, &code)
        .await
        .map_err(|err| {
            error!("failed to send verification code: {}", err);
            AppError::Internal(err)
        })
}

pub async fn verify_sms_code(state: &AppState, payload: SmsVerifyRequest) -> Result<(), AppError> {
    let phone_number = phone_from(payload.phone_number.as_deref())?;
    let code = payload
        .auth_code
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::BadRequest("인증번호를 입력해주세요.".to_string()))?;
    if state.verification_store.consume(&phone_number, code).await {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "인증번호가 일치하지 않거나 만료되었습니다.".to_string(),
        ))
    }
}

pub async fn signup(state: &AppState, payload: SignupRequest) -> Result<User, AppError> {
    payload.validate()?;
    let username = payload.username.trim().to_string();
    let phone_number = phone_from(Some(&payload.phone_number))?;

    if state
        .user_repo
        .find_user_by_username(&username)
        .await
        .map_err(AppError::Internal)?
        .is_some()
    {
        return Err(AppError::Conflict("이미 사용 중인 아이디입니다.".to_string()));
    }
    if state
        .user_repo
        .find_user_by_phone(&phone_number)
        .await
        .map_err(AppError::Internal)?
        .is_some()
    {
        return Err(AppError::Conflict("이미 가입된 전화번호입니다.".to_string()));
    }

    let user = state
        .user_repo
        .insert_user(NewUser {
            username,
            password_hash: hash_password(&state.config, &payload.password)?,
            name: payload.name.trim().to_string(),
            phone_number,
            birth_date: payload.birth_date,
            agreements: payload.agreements(),
        })
        .await
        .map_err(AppError::Internal)?;
    info!(user_id = user.id, "user signed up");
    Ok(user)
}

pub async fn login(state: &AppState, payload: LoginRequest) -> Result<TokenPair, AppError> {
    let user = state
        .user_repo
        .find_user_by_username(payload.username.trim())
        .await
        .map_err(AppError::Internal)?;
    match user {
        Some(user) if verify_password(&payload.password, &user.password_hash) => {
            state.metrics.record_login(true);
            issue_tokens(&state.config, &user)
        }
        _ => {
            state.metrics.record_login(false);
            warn!(username = payload.username.trim(), "login failed");
            Err(AppError::Unauthorized)
        }
    }
}

/// Trades a refresh token for a new access token. The user must still exist.
pub async fn refresh_access(
    state: &AppState,
    payload: TokenRefreshRequest,
) -> Result<AccessToken, AppError> {
    let claims = decode_refresh_token(&state.config, payload.refresh.trim())?;
    let user = state
        .user_repo
        .find_user(claims.sub)
        .await
        .map_err(AppError::Internal)?
        .ok_or(AppError::Unauthorized)?;
    Ok(AccessToken {
        access: issue_access_token(&state.config, &user)?,
    })
}

fn dedup_preserving_order(ids: Vec<u64>) -> Vec<u64> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

async fn save_and_profile(state: &AppState, user: User) -> Result<UserProfile, AppError> {
    state
        .user_repo
        .save_user(&user)
        .await
        .map_err(AppError::Internal)?;
    Ok(build_profile(&state.catalog, &user))
}

pub async fn update_home_location(
    state: &AppState,
    user_id: u64,
    payload: HomeLocationUpdate,
) -> Result<UserProfile, AppError> {
    let mut user = require_user(state, user_id).await?;
    if let Some(id) = payload.location_id {
        if state.catalog.location(id).is_none() {
            return Err(AppError::BadRequest(format!("unknown location id {id}")));
        }
    }
    user.home_location_id = payload.location_id;
    save_and_profile(state, user).await
}

pub async fn update_interested_locations(
    state: &AppState,
    user_id: u64,
    payload: InterestedLocationsUpdate,
) -> Result<UserProfile, AppError> {
    let mut user = require_user(state, user_id).await?;
    let ids = dedup_preserving_order(payload.location_ids);
    if let Some(unknown) = ids.iter().find(|id| state.catalog.location(**id).is_none()) {
        return Err(AppError::BadRequest(format!("unknown location id {unknown}")));
    }
    user.interested_location_ids = ids;
    save_and_profile(state, user).await
}

pub async fn update_interests(
    state: &AppState,
    user_id: u64,
    payload: InterestsUpdate,
) -> Result<UserProfile, AppError> {
    let mut user = require_user(state, user_id).await?;
    let ids = dedup_preserving_order(payload.subcategory_ids);
    if let Some(unknown) = ids.iter().find(|id| state.catalog.subcategory(**id).is_none()) {
        return Err(AppError::BadRequest(format!("unknown subcategory id {unknown}")));
    }
    user.interest_subcategory_ids = ids;
    save_and_profile(state, user).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_code_is_six_digits() {
        for _ in 0..32 {
            let code = generate_verification_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        assert_eq!(dedup_preserving_order(vec![3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }

    #[test]
    fn phone_is_required() {
        assert!(matches!(phone_from(None), Err(AppError::BadRequest(_))));
        assert!(matches!(phone_from(Some("  ")), Err(AppError::BadRequest(_))));
        assert_eq!(
            phone_from(Some("010-1234-5678")).expect("phone"),
            "+821012345678"
        );
    }
}
