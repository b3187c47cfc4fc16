#![allow(dead_code)]

use actix_web::{test, web};
use serde_json::{json, Value};
use template_server::{AppState, Settings};

pub async fn test_state() -> web::Data<AppState> {
    let config = Settings::new_for_test().expect("Failed to load test config");
    let state = AppState::new(config).await.expect("Failed to build app state");
    web::Data::new(state)
}

macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($state.clone())
                .configure(template_server::configure),
        )
        .await
    };
}

macro_rules! login_token {
    ($app:expr, $email:expr, $password:expr) => {{
        let body: serde_json::Value = actix_web::test::call_and_read_body_json(
            &$app,
            common::login_request($email, $password).to_request(),
        )
        .await;
        body["access_token"]
            .as_str()
            .expect("login should return an access token")
            .to_string()
    }};
}

pub fn register_request(email: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post().uri("/register").set_json(json!({
        "email": email,
        "first_name": "Test",
        "last_name": "User",
        "password": password
    }))
}

pub fn login_request(email: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post().uri("/login").set_json(json!({
        "email": email,
        "password": password
    }))
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

pub fn template_body(name: &str) -> Value {
    json!({
        "template_name": name,
        "subject": format!("{} subject", name),
        "body": format!("{} body", name)
    })
}
