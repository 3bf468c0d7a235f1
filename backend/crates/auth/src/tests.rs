//! Unit and HTTP contract tests for the auth crate

#[cfg(test)]
mod error_tests {
    use crate::error::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use platform::jwt::TokenError;

    #[test]
    fn test_error_into_response_status_codes() {
        let test_cases: Vec<(AuthError, StatusCode)> = vec![
            (AuthError::UserNotFound, StatusCode::NOT_FOUND),
            (AuthError::EmailTaken, StatusCode::CONFLICT),
            (AuthError::WalletTaken, StatusCode::CONFLICT),
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::MissingToken, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidToken, StatusCode::UNAUTHORIZED),
            (AuthError::TokenExpired, StatusCode::UNAUTHORIZED),
            (AuthError::InsufficientRole, StatusCode::FORBIDDEN),
            (AuthError::KycRequired, StatusCode::FORBIDDEN),
            (AuthError::RoleNotAllowed, StatusCode::BAD_REQUEST),
            (
                AuthError::UnknownCode {
                    field: "role",
                    value: "OWNER".into(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                AuthError::Internal("test".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(
                response.status(),
                expected_status,
                "Error should return correct status code"
            );
        }
    }

    #[test]
    fn test_token_errors_map_to_unauthorized() {
        assert!(matches!(
            AuthError::from(TokenError::Expired),
            AuthError::TokenExpired
        ));
        assert!(matches!(
            AuthError::from(TokenError::Invalid),
            AuthError::InvalidToken
        ));
        assert_eq!(AuthError::from(TokenError::Issue("x".into())).status_code(), 500);
    }

    #[test]
    fn test_kyc_required_carries_action() {
        let app_err = AuthError::KycRequired.into_app_error();
        assert_eq!(app_err.status_code(), 403);
        assert!(app_err.action().is_some());
    }
}

#[cfg(test)]
mod middleware_tests {
    use crate::domain::value_object::user_role::UserRole;
    use crate::presentation::middleware::AuthUser;
    use kernel::id::UserId;
    use platform::jwt::Claims;

    fn claims(sub: String, role: &str) -> Claims {
        Claims {
            sub,
            role: role.to_string(),
            email: "lister@deedify.test".to_string(),
            iat: 0,
            exp: 0,
        }
    }

    #[test]
    fn test_from_claims() {
        let id = UserId::new();
        let user = AuthUser::from_claims(claims(id.to_string(), "LISTER")).unwrap();
        assert_eq!(user.user_id, id);
        assert_eq!(user.role, UserRole::Lister);
    }

    #[test]
    fn test_from_claims_rejects_garbage() {
        assert!(AuthUser::from_claims(claims("nobody".into(), "LISTER")).is_err());
        assert!(AuthUser::from_claims(claims(UserId::new().to_string(), "ROOT")).is_err());
    }

    #[test]
    fn test_ensure_role() {
        let user = AuthUser::from_claims(claims(UserId::new().to_string(), "INVESTOR")).unwrap();
        assert!(user.ensure_role(&[UserRole::Investor, UserRole::Lister]).is_ok());
        assert_eq!(
            user.ensure_role(&[UserRole::Admin]).unwrap_err().status_code(),
            403
        );
    }
}

#[cfg(test)]
mod http_tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use kernel::id::UserId;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::application::config::AuthConfig;
    use crate::domain::repository::UserRepository;
    use crate::domain::value_object::{email::Email, user_role::UserRole};
    use crate::infra::memory::InMemoryUserRepository;
    use crate::presentation::router::auth_router_generic;

    const WALLET_A: &str = "SysvarRent111111111111111111111111111111111";
    const WALLET_B: &str = "SysvarC1ock11111111111111111111111111111111";

    fn app() -> (Router, AuthConfig) {
        let (router, config, _) = app_with_repo();
        (router, config)
    }

    fn app_with_repo() -> (Router, AuthConfig, InMemoryUserRepository) {
        let config = AuthConfig::development();
        let repo = InMemoryUserRepository::new();
        let router = auth_router_generic(repo.clone(), config.clone());
        (router, config, repo)
    }

    async fn set_role(repo: &InMemoryUserRepository, email: &str, role: UserRole) {
        let mut user = repo
            .find_by_email(&Email::new(email).unwrap())
            .await
            .unwrap()
            .unwrap();
        user.set_role(role);
        repo.update(&user).await.unwrap();
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn register(app: &Router, email: &str, extra: Value) -> (StatusCode, Value) {
        let mut body = json!({ "email": email, "password": "Harvest-Moon-2024" });
        if let (Some(target), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
            target.extend(extra.clone());
        }
        send(app, "POST", "/register", None, Some(body)).await
    }

    #[tokio::test]
    async fn test_register_returns_token_and_pending_kyc() {
        let (app, _) = app();

        let (status, body) = register(
            &app,
            "alice@deedify.test",
            json!({ "walletAddress": WALLET_A, "displayName": "Alice" }),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert!(body["accessToken"].as_str().is_some_and(|t| !t.is_empty()));
        assert_eq!(body["user"]["kycStatus"], "PENDING");
        assert_eq!(body["user"]["role"], "INVESTOR");
        assert_eq!(body["user"]["walletAddress"], WALLET_A);
    }

    #[tokio::test]
    async fn test_register_same_email_twice_conflicts() {
        let (app, _) = app();

        let (first, _) = register(&app, "bob@deedify.test", json!({})).await;
        assert_eq!(first, StatusCode::CREATED);

        let (second, body) = register(&app, "bob@deedify.test", json!({})).await;
        assert_eq!(second, StatusCode::CONFLICT);
        assert_eq!(body["statusCode"], 409);
    }

    #[tokio::test]
    async fn test_register_with_taken_wallet_conflicts() {
        let (app, _) = app();

        register(&app, "carol@deedify.test", json!({ "walletAddress": WALLET_A })).await;
        let (status, _) =
            register(&app, "dave@deedify.test", json!({ "walletAddress": WALLET_A })).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_register_admin_role_is_refused() {
        let (app, _) = app();
        let (status, _) = register(&app, "eve@deedify.test", json!({ "role": "ADMIN" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_register_invalid_fields_lists_details() {
        let (app, _) = app();

        let (status, body) = send(
            &app,
            "POST",
            "/register",
            None,
            Some(json!({ "email": "not-an-email", "password": "short" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let fields: Vec<&str> = body["details"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|d| d["field"].as_str())
            .collect();
        assert_eq!(fields, vec!["email", "password"]);
    }

    #[tokio::test]
    async fn test_login_with_wrong_credentials_is_unauthorized() {
        let (app, _) = app();
        register(&app, "frank@deedify.test", json!({})).await;

        let (wrong_password, wrong_body) = send(
            &app,
            "POST",
            "/login",
            None,
            Some(json!({ "email": "frank@deedify.test", "password": "Harvest-Moon-2025" })),
        )
        .await;
        let (unknown_email, unknown_body) = send(
            &app,
            "POST",
            "/login",
            None,
            Some(json!({ "email": "ghost@deedify.test", "password": "Harvest-Moon-2024" })),
        )
        .await;

        assert_eq!(wrong_password, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_email, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_body["message"], unknown_body["message"]);

        let (ok, body) = send(
            &app,
            "POST",
            "/login",
            None,
            Some(json!({ "email": "frank@deedify.test", "password": "Harvest-Moon-2024" })),
        )
        .await;
        assert_eq!(ok, StatusCode::OK);
        assert_eq!(body["user"]["email"], "frank@deedify.test");
    }

    #[tokio::test]
    async fn test_profile_requires_bearer_token() {
        let (app, _) = app();

        let (missing, _) = send(&app, "GET", "/profile", None, None).await;
        assert_eq!(missing, StatusCode::UNAUTHORIZED);

        let (garbage, _) = send(&app, "GET", "/profile", Some("not.a.jwt"), None).await;
        assert_eq!(garbage, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_profile_update_with_foreign_wallet_conflicts() {
        let (app, _) = app();

        register(&app, "grace@deedify.test", json!({ "walletAddress": WALLET_A })).await;
        let (_, heidi) = register(&app, "heidi@deedify.test", json!({})).await;
        let token = heidi["accessToken"].as_str().unwrap();

        let (status, _) = send(
            &app,
            "POST",
            "/profile",
            Some(token),
            Some(json!({ "walletAddress": WALLET_A })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(
            &app,
            "POST",
            "/profile",
            Some(token),
            Some(json!({ "walletAddress": WALLET_B, "displayName": "Heidi" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["walletAddress"], WALLET_B);
        assert_eq!(body["displayName"], "Heidi");
    }

    #[tokio::test]
    async fn test_admin_routes_reject_non_admins() {
        let (app, _) = app();
        let (_, ivan) = register(&app, "ivan@deedify.test", json!({ "role": "LISTER" })).await;
        let token = ivan["accessToken"].as_str().unwrap();

        let (status, _) = send(&app, "GET", "/users", Some(token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_can_override_kyc() {
        let (app, _, repo) = app_with_repo();
        let (_, judy) = register(&app, "judy@deedify.test", json!({})).await;
        let judy_id = judy["user"]["id"].as_str().unwrap().to_string();

        let (_, root) = register(&app, "root@deedify.test", json!({})).await;
        set_role(&repo, "root@deedify.test", UserRole::Admin).await;
        let admin_token = root["accessToken"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            "POST",
            &format!("/users/{judy_id}/kyc"),
            Some(&admin_token),
            Some(json!({ "status": "VERIFIED" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["kycStatus"], "VERIFIED");

        let (status, body) = send(&app, "GET", "/users?limit=10", Some(&admin_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"].as_array().unwrap().len(), 2);

        let (status, _) = send(
            &app,
            "POST",
            &format!("/users/{judy_id}/kyc"),
            Some(&admin_token),
            Some(json!({ "status": "MAYBE" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_role_change_applies_to_issued_tokens() {
        let (app, _, repo) = app_with_repo();
        let (_, ken) = register(&app, "ken@deedify.test", json!({})).await;
        let token = ken["accessToken"].as_str().unwrap().to_string();

        set_role(&repo, "ken@deedify.test", UserRole::Admin).await;
        let (status, _) = send(&app, "GET", "/users", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        // 降格は次のリクエストから効く
        set_role(&repo, "ken@deedify.test", UserRole::Investor).await;
        let (status, _) = send(&app, "GET", "/users", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_token_of_unknown_user_is_rejected() {
        let (app, config) = app();
        let token = config
            .tokens
            .issue(&UserId::new().to_string(), "ADMIN", "ghost@deedify.test")
            .unwrap();

        let (status, _) = send(&app, "GET", "/users", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
