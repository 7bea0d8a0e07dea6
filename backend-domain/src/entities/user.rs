// User entity and account payloads

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::{LocationView, UserInterest};

pub const MIN_PASSWORD_CHARS: usize = 8;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Agreements {
    pub location_services: bool,
    pub marketing_push: bool,
    pub terms: bool,
    pub privacy: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub phone_number: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub agreements: Agreements,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub home_location_id: Option<u64>,
    #[serde(default)]
    pub interested_location_ids: Vec<u64>,
    #[serde(default)]
    pub interest_subcategory_ids: Vec<u64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub phone_number: String,
    pub birth_date: Option<NaiveDate>,
    pub agreements: Agreements,
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub password2: String,
    #[serde(default)]
    pub name: String,
    pub phone_number: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub location_services_agreed: bool,
    #[serde(default)]
    pub marketing_push_agreed: bool,
    #[serde(default)]
    pub terms_agreed: bool,
    #[serde(default)]
    pub privacy_agreed: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignupError {
    #[error("아이디를 입력해주세요.")]
    MissingUsername,
    #[error("비밀번호는 {MIN_PASSWORD_CHARS}자 이상이어야 합니다.")]
    PasswordTooShort,
    #[error("비밀번호가 일치하지 않습니다.")]
    PasswordMismatch,
    #[error("필수 약관에 동의해주세요.")]
    RequiredAgreementMissing,
}

impl SignupRequest {
    /// Checks the fields that do not need storage lookups.
    pub fn validate(&self) -> Result<(), SignupError> {
        if self.username.trim().is_empty() {
            return Err(SignupError::MissingUsername);
        }
        if self.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(SignupError::PasswordTooShort);
        }
        if self.password != self.password2 {
            return Err(SignupError::PasswordMismatch);
        }
        if !(self.location_services_agreed && self.terms_agreed && self.privacy_agreed) {
            return Err(SignupError::RequiredAgreementMissing);
        }
        Ok(())
    }

    pub fn agreements(&self) -> Agreements {
        Agreements {
            location_services: self.location_services_agreed,
            marketing_push: self.marketing_push_agreed,
            terms: self.terms_agreed,
            privacy: self.privacy_agreed,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenRefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct AccessToken {
    pub access: String,
}

#[derive(Debug, Deserialize)]
pub struct UsernameCheckRequest {
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UsernameAvailability {
    pub is_available: bool,
}

#[derive(Debug, Deserialize)]
pub struct SmsSendRequest {
    #[serde(default)]
    pub phone_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SmsVerifyRequest {
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub auth_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HomeLocationUpdate {
    pub location_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct InterestedLocationsUpdate {
    pub location_ids: Vec<u64>,
}

#[derive(Debug, Deserialize)]
pub struct InterestsUpdate {
    pub subcategory_ids: Vec<u64>,
}

#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: u64,
    pub username: String,
    pub name: String,
    pub phone_number: String,
    pub birth_date: Option<NaiveDate>,
    pub home_location: Option<LocationView>,
    pub interested_locations: Vec<LocationView>,
    pub interests: Vec<UserInterest>,
}
