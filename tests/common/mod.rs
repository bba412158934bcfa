#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use tripline::{
    AppConfig, AppState, InMemoryRepository, Repository, auth::ensure_admin, build_router,
};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "adminpass";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub async fn app() -> TestApp {
    app_with_config(AppConfig::for_tests()).await
}

pub async fn app_with_config(config: AppConfig) -> TestApp {
    let repo: Arc<dyn Repository> = Arc::new(InMemoryRepository::new());
    let state = AppState::from_config(&config, Arc::clone(&repo)).expect("state should build");
    ensure_admin(repo.as_ref(), &state.auth, ADMIN_USERNAME, ADMIN_PASSWORD)
        .await
        .expect("admin should be created");

    TestApp {
        router: build_router(state.clone()),
        state,
    }
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        payload: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match payload {
            Some(payload) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(payload.to_string())
            }
            None => Body::empty(),
        };
        let request = builder.body(body).expect("request should build");
        self.dispatch(request).await
    }

    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        raw_json: &str,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = builder
            .body(Body::from(raw_json.to_string()))
            .expect("request should build");
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("response expected");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body should be readable");

        if body.is_empty() {
            return (status, Value::Null);
        }

        let json = serde_json::from_slice::<Value>(&body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()));
        (status, json)
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"]
            .as_str()
            .expect("login should return a token")
            .to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await
    }

    pub async fn create_invite(&self) -> String {
        let admin = self.admin_token().await;
        let (status, body) = self
            .send(Method::POST, "/api/admin/invites", Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::CREATED, "invite failed: {body}");
        body["code"].as_str().expect("invite code").to_string()
    }

    /// Registers an approved user through an invite code; returns (id, token).
    pub async fn register_approved(&self, username: &str) -> (String, String) {
        let code = self.create_invite().await;
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "username": username,
                    "password": "password123",
                    "inviteCode": code,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        let id = body["user"]["id"].as_str().expect("user id").to_string();
        let token = body["token"].as_str().expect("token").to_string();
        (id, token)
    }
}
