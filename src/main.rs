mod config;
mod domain;
mod infrastructure;
mod presentation;
mod usecase;

#[cfg(test)]
mod test_support;

use sea_orm::{ConnectOptions, Database};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::AppConfig,
    infrastructure::{
        argon2_password_hasher::Argon2PasswordHasher, clash_tag_validator::ClashApiTagValidator,
        jwt_token_generator::JwtTokenGenerator, schema::create_tables,
        user_registration_repository::SeaOrmUserRegistrationRepository,
    },
    presentation::handlers::player_handler::create_player_router,
    usecase::register_user_usecase::RegisterUserUsecase,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    info!(?config, "configuration loaded");

    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(10)
        .min_connections(1)
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    create_tables(&db).await?;

    let registration_repository = SeaOrmUserRegistrationRepository::new(db.clone());
    let password_hasher = Argon2PasswordHasher::new();
    let token_generator =
        JwtTokenGenerator::with_expiration(config.jwt_secret.clone(), config.session_ttl_hours);
    let tag_validator = ClashApiTagValidator::new(
        config.clash_api_base_url.clone(),
        config.clash_api_key.clone(),
        config.clash_api_timeout,
    )?;
    let register_user_usecase = RegisterUserUsecase::new(registration_repository, password_hasher);

    let app = create_player_router(register_user_usecase, token_generator, tag_validator);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        response::Response,
    };
    use http_body_util::BodyExt;
    use rstest::*;
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::{
        domain::{
            error::{DomainError, RepositoryError},
            models::{
                credential::HashedPassword,
                player_profile::{PlayerProfile, PlayerTag},
                user::{User, Username},
            },
            repositories::user_registration_repository::UserRegistrationRepository,
            services::{
                password_service::PasswordHasher, tag_validation_service::PlayerTagValidator,
                token_service::TokenGenerator,
            },
        },
        infrastructure::user_registration_repository::SeaOrmUserRegistrationRepository,
        presentation::{
            error::ErrorResponse,
            handlers::player_handler::{
                ProfileRequest, RegisterRequest, RegisterResponse, ValidateTagResponse,
                create_player_router,
            },
        },
        test_support::in_memory_database,
        usecase::register_user_usecase::RegisterUserUsecase,
    };

    const TEST_ID: &str = "00000000-0000-0000-0000-000000000001";

    // mock repository interface
    #[derive(Clone)]
    struct MockRegistrationRepository;

    #[async_trait]
    impl UserRegistrationRepository for MockRegistrationRepository {
        async fn register_user_with_profiles(
            &self,
            username: &Username,
            _password_hash: HashedPassword,
            profiles: &[PlayerProfile],
        ) -> Result<User, RepositoryError> {
            if username.as_str() == "duplicated_user" {
                return Err(RepositoryError::DuplicateUsername);
            }
            if let Some(taken) = profiles
                .iter()
                .find(|profile| profile.player_tag().as_str() == "TAKEN1")
            {
                return Err(RepositoryError::DuplicateTag(
                    taken.player_tag().as_str().to_string(),
                ));
            }
            let id = Uuid::parse_str(TEST_ID).unwrap();
            Ok(User::new(id, username.clone(), profiles.to_vec()))
        }
    }

    #[derive(Clone)]
    struct MockPasswordHasher;

    impl PasswordHasher for MockPasswordHasher {
        fn hash(&self, _plain_password: &str) -> Result<HashedPassword, DomainError> {
            Ok(HashedPassword::new("mock_hash".to_string()))
        }
    }

    #[derive(Clone)]
    struct MockTokenGenerator;

    impl TokenGenerator for MockTokenGenerator {
        fn generate(&self, _user: &User) -> Result<String, DomainError> {
            Ok("mock_token".to_string())
        }
    }

    /// Directory stub: `ABC123` exists, `DOWN01` simulates a transport failure
    #[derive(Clone, Default)]
    struct MockTagValidator {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PlayerTagValidator for MockTagValidator {
        async fn exists(&self, tag: &PlayerTag) -> Result<bool, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match tag.as_str() {
                "ABC123" => Ok(true),
                "DOWN01" => Err(DomainError::GatewayUnreachable(
                    "connection refused".to_string(),
                )),
                _ => Ok(false),
            }
        }
    }

    #[fixture]
    fn tag_validator() -> MockTagValidator {
        MockTagValidator::default()
    }

    fn app_with(tag_validator: MockTagValidator) -> Router {
        // set up mock repository
        let register_user_usecase =
            RegisterUserUsecase::new(MockRegistrationRepository, MockPasswordHasher);

        // setup router: sync settings of main.app
        create_player_router(register_user_usecase, MockTokenGenerator, tag_validator)
    }

    #[fixture]
    fn test_app(tag_validator: MockTagValidator) -> Router {
        app_with(tag_validator)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> T {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn register_body(username: &str, profiles: &[(&str, Option<bool>)]) -> String {
        let request = RegisterRequest {
            username: username.to_string(),
            password: "new_password".to_string(),
            profiles: profiles
                .iter()
                .map(|(tag, is_primary)| ProfileRequest {
                    player_tag: tag.to_string(),
                    is_primary: *is_primary,
                })
                .collect(),
        };
        serde_json::to_string(&request).unwrap()
    }

    // Register usecase

    /// # Description
    ///
    /// This function is general register handler
    /// Call this function from test case for register
    async fn register(app: Router, body: String) -> Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri("/register/")
                .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    #[rstest]
    #[tokio::test]
    async fn test_register_positive(test_app: Router) {
        let body = register_body("new_user", &[("ABC123", None), ("#xyz789", None)]);

        // send request
        let response = register(test_app, body).await;

        // validation
        assert_eq!(response.status(), StatusCode::CREATED);
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(cookie.starts_with("session=mock_token;"));
        assert!(cookie.contains("HttpOnly"));

        let register_response: RegisterResponse = read_json(response).await;
        assert_eq!(register_response.token, "mock_token");
        assert_eq!(register_response.user.id, TEST_ID);
        assert_eq!(register_response.user.username, "new_user");
        let profiles = &register_response.user.profiles;
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].player_tag, "ABC123");
        assert!(profiles[0].is_primary);
        assert_eq!(profiles[1].player_tag, "XYZ789");
        assert!(!profiles[1].is_primary);
    }

    #[rstest]
    #[tokio::test]
    async fn test_register_response_omits_password(test_app: Router) {
        let response = register(test_app, register_body("new_user", &[("ABC123", None)])).await;

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!text.contains("password"));
        assert!(!text.contains("new_password"));
    }

    #[rstest]
    #[case(
        r#"{"username":"duplicated_user","password":"new_password","profiles":[{"player_tag":"ABC123"}]}"#,
        "duplicate_username"
    )]
    #[case(
        r#"{"username":"new_user","password":"new_password","profiles":[{"player_tag":"TAKEN1"}]}"#,
        "duplicate_tag"
    )]
    #[case(
        r#"{"username":"new_user","password":"new_password","profiles":[{"player_tag":"ABC123","is_primary":true},{"player_tag":"XYZ789","is_primary":true}]}"#,
        "multiple_primary_tags"
    )]
    #[case(
        r#"{"username":"new_user","password":"new_password","profiles":[]}"#,
        "empty_profile_list"
    )]
    #[case(
        r#"{"username":"new_user","password":"new_password"}"#,
        "empty_profile_list"
    )]
    #[case(
        r#"{"username":"new_user","password":"new_password","profiles":[{"player_tag":"NOT-A-TAG!"}]}"#,
        "validation_failure"
    )]
    #[case(
        r#"{"username":"","password":"new_password","profiles":[{"player_tag":"ABC123"}]}"#,
        "validation_failure"
    )]
    #[case(
        r#"{"password":"new_password","profiles":[{"player_tag":"ABC123"}]}"#,
        "validation_failure"
    )]
    #[case(
        r#"{"username":"new_user","password":"new_password","profiles":[{"is_primary":true}]}"#,
        "validation_failure"
    )]
    #[case(
        r#"{"username":"new_user","password":"new_password","profiles":"nope"}"#,
        "validation_failure"
    )]
    #[tokio::test]
    async fn test_register_negative(test_app: Router, #[case] body: &str, #[case] code: &str) {
        let response = register(test_app, body.to_string()).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        let error: ErrorResponse = read_json(response).await;
        assert_eq!(error.code, code);
    }

    #[rstest]
    #[tokio::test]
    async fn test_register_validation_failure_names_field(test_app: Router) {
        let response = register(test_app, register_body("new_user", &[("ABCDEFGHIJK", None)])).await;

        let error: ErrorResponse = read_json(response).await;
        assert_eq!(error.code, "validation_failure");
        assert_eq!(error.field.as_deref(), Some("player_tag"));
    }

    #[rstest]
    #[tokio::test]
    async fn test_register_unreadable_body_names_body_field(test_app: Router) {
        let body = r#"{"password":"new_password","profiles":[{"player_tag":"ABC123"}]}"#;
        let response = register(test_app, body.to_string()).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ErrorResponse = read_json(response).await;
        assert_eq!(error.code, "validation_failure");
        assert_eq!(error.field.as_deref(), Some("body"));
        assert!(error.message.contains("username"));
    }

    #[tokio::test]
    async fn test_register_twice_against_database() {
        let db = in_memory_database().await;
        let app = create_player_router(
            RegisterUserUsecase::new(
                SeaOrmUserRegistrationRepository::new(db),
                MockPasswordHasher,
            ),
            MockTokenGenerator,
            MockTagValidator::default(),
        );

        let first = register(app.clone(), register_body("chief", &[("ABC123", None)])).await;
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = register(app, register_body("chief", &[("XYZ789", None)])).await;
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
        let error: ErrorResponse = read_json(second).await;
        assert_eq!(error.code, "duplicate_username");
    }

    // Validate tag usecase

    async fn validate(app: Router, path_tag: &str) -> Response {
        app.oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/validate-player-tag/{path_tag}/"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    #[rstest]
    #[case("ABC123")]
    #[case("%23ABC123")]
    #[case("abc123")]
    #[tokio::test]
    async fn test_validate_existing_tag(test_app: Router, #[case] path_tag: &str) {
        let response = validate(test_app, path_tag).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: ValidateTagResponse = read_json(response).await;
        assert!(body.valid);
    }

    #[rstest]
    #[tokio::test]
    async fn test_validate_unknown_tag(test_app: Router) {
        let response = validate(test_app, "XYZ789").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ValidateTagResponse = read_json(response).await;
        assert!(!body.valid);
    }

    #[rstest]
    #[tokio::test]
    async fn test_validate_malformed_tag_skips_directory(tag_validator: MockTagValidator) {
        let calls = tag_validator.calls.clone();
        let app = app_with(tag_validator);

        let response = validate(app, "TOOLONGTAG123").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ValidateTagResponse = read_json(response).await;
        assert!(!body.valid);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn test_validate_unreachable_directory(test_app: Router) {
        let response = validate(test_app, "DOWN01").await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let error: ErrorResponse = read_json(response).await;
        assert_eq!(error.code, "gateway_unreachable");
    }

    #[rstest]
    #[tokio::test]
    async fn test_validate_is_idempotent(tag_validator: MockTagValidator) {
        let calls = tag_validator.calls.clone();
        let app = app_with(tag_validator);

        for tag in ["ABC123", "XYZ789"] {
            let first = validate(app.clone(), tag).await;
            let second = validate(app.clone(), tag).await;
            assert_eq!(first.status(), second.status());
            let first: ValidateTagResponse = read_json(first).await;
            let second: ValidateTagResponse = read_json(second).await;
            assert_eq!(first.valid, second.valid);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[rstest]
    #[tokio::test]
    async fn test_route_without_trailing_slash(test_app: Router) {
        let response = test_app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/validate-player-tag/ABC123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
