use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Serialize;

use backend_application::commands::user_commands;
use backend_application::queries::user_queries;
use backend_application::AppState;
use backend_domain::{
    AccessToken, CategoryTree, HomeLocationUpdate, InterestedLocationsUpdate, InterestsUpdate,
    LocationSearchQuery, LocationView, LoginRequest, SignupRequest, SmsSendRequest,
    SmsVerifyRequest, TokenPair, TokenRefreshRequest, UserProfile, UsernameAvailability,
    UsernameCheckRequest,
};

use crate::error::HttpError;
use crate::middleware::authenticate;

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: u16,
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

pub async fn check_username(
    State(state): State<AppState>,
    Json(payload): Json<UsernameCheckRequest>,
) -> Result<Json<Envelope<UsernameAvailability>>, HttpError> {
    let username = payload.username.unwrap_or_default();
    let is_available = user_queries::check_username_available(&state, &username).await?;
    let message = if is_available {
        "사용 가능한 아이디입니다."
    } else {
        "중복된 아이디입니다. 다시 입력해주세요."
    };
    Ok(Json(Envelope {
        status: StatusCode::OK.as_u16(),
        success: is_available,
        message: message.to_string(),
        data: Some(UsernameAvailability { is_available }),
    }))
}

pub async fn send_sms(
    State(state): State<AppState>,
    Json(payload): Json<SmsSendRequest>,
) -> Result<Json<MessageBody>, HttpError> {
    user_commands::send_sms_code(&state, payload).await?;
    Ok(MessageBody::new("인증번호가 발송되었습니다."))
}

pub async fn verify_sms(
    State(state): State<AppState>,
    Json(payload): Json<SmsVerifyRequest>,
) -> Result<Json<MessageBody>, HttpError> {
    user_commands::verify_sms_code(&state, payload).await?;
    Ok(MessageBody::new("인증에 성공했습니다."))
}

pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<MessageBody>), HttpError> {
    let user = user_commands::signup(&state, payload).await?;
    Ok((
        StatusCode::CREATED,
        MessageBody::new(format!("{}님, 회원가입이 완료되었습니다.", user.username)),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenPair>, HttpError> {
    Ok(Json(user_commands::login(&state, payload).await?))
}

pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<TokenRefreshRequest>,
) -> Result<Json<AccessToken>, HttpError> {
    Ok(Json(user_commands::refresh_access(&state, payload).await?))
}

pub async fn get_me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserProfile>, HttpError> {
    let user_id = authenticate(&state.config, &headers)?;
    Ok(Json(user_queries::get_profile(&state, user_id).await?))
}

pub async fn update_home_location(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<HomeLocationUpdate>,
) -> Result<Json<UserProfile>, HttpError> {
    let user_id = authenticate(&state.config, &headers)?;
    Ok(Json(
        user_commands::update_home_location(&state, user_id, payload).await?,
    ))
}

pub async fn update_interested_locations(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<InterestedLocationsUpdate>,
) -> Result<Json<UserProfile>, HttpError> {
    let user_id = authenticate(&state.config, &headers)?;
    Ok(Json(
        user_commands::update_interested_locations(&state, user_id, payload).await?,
    ))
}

pub async fn update_interests(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<InterestsUpdate>,
) -> Result<Json<UserProfile>, HttpError> {
    let user_id = authenticate(&state.config, &headers)?;
    Ok(Json(
        user_commands::update_interests(&state, user_id, payload).await?,
    ))
}

pub async fn search_locations(
    State(state): State<AppState>,
    Query(query): Query<LocationSearchQuery>,
) -> Json<Vec<LocationView>> {
    Json(user_queries::search_locations(&state, query))
}

pub async fn list_categories(State(state): State<AppState>) -> Json<Vec<CategoryTree>> {
    Json(user_queries::list_categories(&state))
}
