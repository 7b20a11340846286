//! Router assembly

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use portal_shared::constants::{GENERIC_ERROR_MESSAGE, SESSION_ENDPOINT};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::error;

use crate::handlers::{auth, health, protected, session};
use crate::response::ErrorBody;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let callback_path = state.config.auth.callback_path.clone();

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth redirects
        .route("/login", get(auth::login))
        .route(&callback_path, get(auth::callback))
        .route("/logout", get(auth::logout))
        // Session APIs
        .route(SESSION_ENDPOINT, get(session::session))
        .route("/api/auth/me", get(session::me))
        .route("/api/protected", get(protected::protected))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CatchPanicLayer::custom(handle_panic)),
        )
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("Handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new(GENERIC_ERROR_MESSAGE)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{
            header::{COOKIE, LOCATION, SET_COOKIE},
            Request,
        },
    };
    use portal_core::services::cookies::set_cookie;
    use portal_core::{AuthError, IdentityProvider, SessionLifecycle, SessionRecord};
    use portal_security::SessionCodec;
    use portal_shared::config::{AppSettings, AuthSettings, SessionSettings};
    use portal_shared::AppConfig;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tower::ServiceExt;
    use url::Url;

    struct FakeProvider;

    #[async_trait]
    impl IdentityProvider for FakeProvider {
        async fn exchange_code(&self, code: &str) -> Result<SessionRecord, AuthError> {
            match code {
                "good-code" => Ok(SessionRecord::new(
                    json!({ "email": "a@b.com", "name": "A" }),
                )),
                _ => Err(AuthError::Upstream("token endpoint returned 403".to_string())),
            }
        }
    }

    fn config(env: &str) -> AppConfig {
        AppConfig {
            app: AppSettings {
                env: env.to_string(),
                host: "127.0.0.1".to_string(),
                port: 3000,
                name: "portal-server".to_string(),
                base_url: "http://localhost:3000".to_string(),
                log_dir: None,
            },
            auth: AuthSettings {
                domain: "tenant.auth0.com".to_string(),
                client_id: "client-123".to_string(),
                client_secret: "secret".to_string(),
                audience: None,
                secret: "0123456789abcdef0123456789abcdef".to_string(),
                callback_path: "/auth/callback".to_string(),
                state_ttl_seconds: 600,
            },
            session: SessionSettings::default(),
            email: None,
        }
    }

    fn app_for(env: &str) -> Router {
        let config = config(env);
        let lifecycle = SessionLifecycle::new(&config, Arc::new(FakeProvider)).unwrap();
        build_router(AppState::new(config, lifecycle))
    }

    fn app() -> Router {
        app_for("test")
    }

    fn session_cookie(record: &SessionRecord) -> String {
        let value = SessionCodec::encode(record).unwrap();
        let header = set_cookie("auth0_session", &value, 3600, true).unwrap();
        header.to_str().unwrap().split(';').next().unwrap().to_string()
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn set_cookies(response: &Response) -> Vec<String> {
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    fn location(response: &Response) -> String {
        response.headers().get(LOCATION).unwrap().to_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = app().oneshot(get("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_session_endpoint_returns_user() {
        let cookie = session_cookie(&SessionRecord::new(json!({ "email": "a@b.com" })));
        let response = app()
            .oneshot(get("/api/auth/session", Some(&cookie)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({ "user": { "email": "a@b.com" } }));
    }

    #[tokio::test]
    async fn test_session_endpoint_without_cookie() {
        let response = app().oneshot(get("/api/auth/session", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await, json!({ "user": null }));
    }

    #[tokio::test]
    async fn test_expired_session_is_absent() {
        let record = SessionRecord {
            user: json!({ "email": "a@b.com" }),
            expires_at: Some(1),
        };
        let cookie = session_cookie(&record);
        let response = app()
            .oneshot(get("/api/auth/session", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_malformed_cookie_is_absent() {
        let response = app()
            .oneshot(get("/api/auth/session", Some("auth0_session=not-json")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await, json!({ "user": null }));
    }

    #[tokio::test]
    async fn test_me_without_session() {
        let response = app().oneshot(get("/api/auth/me", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await, json!({ "error": "No session found" }));
    }

    #[tokio::test]
    async fn test_me_returns_raw_user() {
        let cookie = session_cookie(&SessionRecord::new(json!({ "sub": "auth0|1" })));
        let response = app().oneshot(get("/api/auth/me", Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({ "sub": "auth0|1" }));
    }

    #[tokio::test]
    async fn test_protected_route() {
        let response = app().oneshot(get("/api/protected", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let cookie = session_cookie(&SessionRecord::new(json!({ "email": "a@b.com" })));
        let response = app()
            .oneshot(get("/api/protected", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["user"]["email"], "a@b.com");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_login_then_callback() {
        let response = app()
            .oneshot(get("/login?returnTo=/dashboard", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);

        let authorize = location(&response);
        assert!(authorize.starts_with("https://tenant.auth0.com/authorize?"));
        let params: HashMap<String, String> =
            Url::parse(&authorize).unwrap().query_pairs().into_owned().collect();

        let state_cookie = set_cookies(&response)
            .into_iter()
            .next()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();
        assert!(state_cookie.starts_with("auth0_state="));

        let callback = Url::parse_with_params(
            "http://localhost:3000/auth/callback",
            &[("code", "good-code"), ("state", params["state"].as_str())],
        )
        .unwrap();
        let uri = format!("{}?{}", callback.path(), callback.query().unwrap());
        let response = app().oneshot(get(&uri, Some(&state_cookie))).await.unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/dashboard");
        let cookies = set_cookies(&response);
        assert_eq!(cookies.len(), 2);
        assert!(cookies[0].starts_with("auth0_session="));
        assert!(cookies[1].starts_with("auth0_state=;"));

        // The new session is visible on the next request.
        let session = cookies[0].split(';').next().unwrap().to_string();
        let response = app()
            .oneshot(get("/api/auth/session", Some(&session)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["user"]["name"], "A");
    }

    #[tokio::test]
    async fn test_callback_with_tampered_state() {
        let response = app()
            .oneshot(get(
                "/auth/callback?code=good-code&state=forged.state",
                Some("auth0_state=abc"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(set_cookies(&response).is_empty());
    }

    #[tokio::test]
    async fn test_callback_provider_error_hides_detail() {
        let response = app()
            .oneshot(get("/auth/callback?error=access_denied", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await, json!({ "error": "Internal server error" }));
    }

    #[tokio::test]
    async fn test_callback_provider_error_detail_in_development() {
        let response = app_for("development")
            .oneshot(get("/auth/callback?error=access_denied", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Internal server error");
        assert!(body["detail"].as_str().unwrap().contains("access_denied"));
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let cookie = session_cookie(&SessionRecord::new(json!({ "email": "a@b.com" })));
        let response = app().oneshot(get("/logout", Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);

        let target = Url::parse(&location(&response)).unwrap();
        assert_eq!(target.path(), "/v2/logout");
        let params: HashMap<String, String> = target.query_pairs().into_owned().collect();
        assert_eq!(params["client_id"], "client-123");
        assert_eq!(params["returnTo"], "http://localhost:3000");

        let cookies = set_cookies(&response);
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].starts_with("auth0_session=;"));
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let response = app().oneshot(get("/health", None)).await.unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_panic_becomes_generic_error() {
        let app = Router::new()
            .route("/boom", axum::routing::get(|| async { panic!("boom") as () }))
            .layer(CatchPanicLayer::custom(handle_panic));

        let response = app.oneshot(get("/boom", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await, json!({ "error": "Internal server error" }));
    }
}
