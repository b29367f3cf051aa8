use std::sync::Arc;

use crate::{
    domain::{
        error::DomainError,
        models::{
            player_profile::{PlayerProfile, PlayerTag, ProfileInput},
            user::User,
        },
        repositories::user_registration_repository::UserRegistrationRepository,
        services::{
            password_service::PasswordHasher, tag_validation_service::PlayerTagValidator,
            token_service::TokenGenerator,
        },
    },
    presentation::error::ApiError,
    usecase::register_user_usecase::{RegisterUserCommand, RegisterUserUsecase},
};
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const SESSION_COOKIE: &str = "session";

// Request

/// json for one profile inside a register request
#[derive(Serialize, Deserialize)]
pub struct ProfileRequest {
    pub player_tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,
}

/// json for register request
#[derive(Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub profiles: Vec<ProfileRequest>,
}

impl From<RegisterRequest> for RegisterUserCommand {
    fn from(request: RegisterRequest) -> Self {
        Self {
            username: request.username,
            password: request.password,
            profiles: request
                .profiles
                .into_iter()
                .map(|profile| ProfileInput {
                    player_tag: profile.player_tag,
                    is_primary: profile.is_primary,
                })
                .collect(),
        }
    }
}

// Response

/// json for register response
#[derive(Serialize, Deserialize)]
pub struct RegisterResponse {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub profiles: Vec<ProfileInfo>,
}

#[derive(Serialize, Deserialize)]
pub struct ProfileInfo {
    pub player_tag: String,
    pub is_primary: bool,
}

/// json for tag validation response
#[derive(Serialize, Deserialize)]
pub struct ValidateTagResponse {
    pub valid: bool,
}

impl From<&PlayerProfile> for ProfileInfo {
    fn from(profile: &PlayerProfile) -> Self {
        Self {
            player_tag: profile.player_tag().as_str().to_string(),
            is_primary: profile.is_primary(),
        }
    }
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().as_str().to_string(),
            profiles: user.profiles().iter().map(ProfileInfo::from).collect(),
        }
    }
}

/* Router Function and Handler Function */

/// Route table for registration and tag validation.
/// Both paths answer with and without the trailing slash.
pub fn create_player_router<
    R: UserRegistrationRepository + Send + Sync + 'static,
    P: PasswordHasher + Send + Sync + 'static,
    T: TokenGenerator + 'static,
    V: PlayerTagValidator + 'static,
>(
    register_service: RegisterUserUsecase<R, P>,
    token_generator: T,
    tag_validator: V,
) -> Router {
    let state = AppState {
        register_service: Arc::new(register_service),
        token_generator: Arc::new(token_generator),
        tag_validator: Arc::new(tag_validator),
    };

    Router::new()
        .route("/register", post(register::<R, P, T, V>))
        .route("/register/", post(register::<R, P, T, V>))
        .route(
            "/validate-player-tag/{player_tag}",
            get(validate_player_tag::<R, P, T, V>),
        )
        .route(
            "/validate-player-tag/{player_tag}/",
            get(validate_player_tag::<R, P, T, V>),
        )
        .with_state(state)
}

pub struct AppState<R: UserRegistrationRepository, P: PasswordHasher, T, V> {
    pub register_service: Arc<RegisterUserUsecase<R, P>>,
    pub token_generator: Arc<T>,
    pub tag_validator: Arc<V>,
}

impl<R: UserRegistrationRepository, P: PasswordHasher, T, V> Clone for AppState<R, P, T, V> {
    fn clone(&self) -> Self {
        Self {
            register_service: Arc::clone(&self.register_service),
            token_generator: Arc::clone(&self.token_generator),
            tag_validator: Arc::clone(&self.tag_validator),
        }
    }
}

// handler function

/// handler function for register
///
/// The session is issued only after the registration has been committed.
async fn register<
    R: UserRegistrationRepository + Send + Sync,
    P: PasswordHasher + Send + Sync,
    T: TokenGenerator,
    V: PlayerTagValidator,
>(
    State(state): State<AppState<R, P, T, V>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Response {
    // missing or mistyped fields are a validation failure, not the framework's 422
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            info!(status = %rejection.status(), "register body rejected");
            return ApiError::from(DomainError::validation("body", rejection.body_text()))
                .into_response();
        }
    };

    let user = match state.register_service.create_user(payload.into()).await {
        Ok(user) => user,
        Err(e) => return ApiError::from(e).into_response(),
    };

    let token = match state.token_generator.generate(&user) {
        Ok(token) => token,
        Err(e) => return ApiError::from(e).into_response(),
    };
    let cookie = format!("{SESSION_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax");

    let response = RegisterResponse {
        token,
        user: UserInfo::from(&user),
    };
    (
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(response),
    )
        .into_response()
}

/// handler function for tag validation
///
/// A well-formed "no" from the directory is answered with 400 `{valid:false}`;
/// an unreachable directory is a 502 error instead.
async fn validate_player_tag<
    R: UserRegistrationRepository + Send + Sync,
    P: PasswordHasher + Send + Sync,
    T: TokenGenerator,
    V: PlayerTagValidator,
>(
    State(state): State<AppState<R, P, T, V>>,
    Path(player_tag): Path<String>,
) -> Response {
    let invalid = || (StatusCode::BAD_REQUEST, Json(ValidateTagResponse { valid: false }));

    let tag = match PlayerTag::parse(&player_tag) {
        Ok(tag) => tag,
        Err(_) => {
            info!(raw = player_tag.as_str(), "malformed player tag");
            return invalid().into_response();
        }
    };

    match state.tag_validator.exists(&tag).await {
        Ok(true) => (StatusCode::OK, Json(ValidateTagResponse { valid: true })).into_response(),
        Ok(false) => invalid().into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
