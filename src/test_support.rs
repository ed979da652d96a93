//! Helpers for driving the full router in handler tests.

use axum::extract::FromRef;
use axum::http::{header::AUTHORIZATION, HeaderName, HeaderValue};
use axum_test::TestServer;
use uuid::Uuid;

use crate::{app::build_app, auth::jwt::JwtKeys, state::AppState};

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_state(AppState::fake())
    }

    pub fn with_state(state: AppState) -> Self {
        let server = TestServer::new(build_app(state.clone())).expect("test server");
        Self { server, state }
    }

    /// `Authorization` header for `user`.
    pub fn auth(&self, user: Uuid) -> (HeaderName, HeaderValue) {
        let token = JwtKeys::from_ref(&self.state).sign(user).expect("sign token");
        let value = HeaderValue::from_str(&format!("Bearer {token}")).expect("header value");
        (AUTHORIZATION, value)
    }
}
