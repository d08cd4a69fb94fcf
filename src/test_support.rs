use axum::{
  body::{Body, Bytes},
  http::{Request, StatusCode},
  Router,
};
use chrono::{Duration, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceExt;

use crate::{
  app::create_app,
  domains::notification_email::schema::NotificationEmailSchema,
  state::{AuthSettings, SharedAppState},
  utils::jwt::{encode_jwt, Claims},
};

pub const SERVICE_NAME: &str = "messages";
pub const JWT_SECRET: &str = "test-secret";

pub async fn app_with_pool(pool: PgPool) -> Router {
  let state = SharedAppState::new(
    pool,
    NotificationEmailSchema::default(),
    AuthSettings {
      service_name: SERVICE_NAME.to_string(),
      jwt_secret: JWT_SECRET.to_string(),
    },
  );
  create_app(state)
}

pub async fn create_customer(pool: &PgPool, name: &str) -> Result<i32, sqlx::Error> {
  sqlx::query_scalar("INSERT INTO customers (name) VALUES ($1) RETURNING id")
    .bind(name)
    .fetch_one(pool)
    .await
}

pub fn bearer_token(customer_id: i32, admin: bool, services: &[&str]) -> String {
  let claims = Claims {
    sub: format!("customer-{}", customer_id),
    exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
    customer_id,
    admin,
    services: services.iter().map(|s| s.to_string()).collect(),
  };
  encode_jwt(&claims, JWT_SECRET).expect("encode token")
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Bytes) {
  let response = app.oneshot(request).await.expect("handle request");
  let status = response.status();
  let body = axum::body::to_bytes(response.into_body(), usize::MAX)
    .await
    .expect("read response body");
  (status, body)
}

fn request(method: &str, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(token) = token {
    builder = builder.header("authorization", format!("Bearer {}", token));
  }
  builder
}

pub async fn get(app: Router, uri: &str, token: Option<&str>) -> (StatusCode, Bytes) {
  let request = request("GET", uri, token).body(Body::empty()).expect("build request");
  send(app, request).await
}

pub async fn post_json<T: Serialize>(app: Router, uri: &str, token: Option<&str>, body: &T) -> (StatusCode, Bytes) {
  let body = serde_json::to_string(body).expect("serialize request body");
  post_raw(app, uri, token, &body).await
}

pub async fn post_raw(app: Router, uri: &str, token: Option<&str>, body: &str) -> (StatusCode, Bytes) {
  let request = request("POST", uri, token)
    .header("content-type", "application/json")
    .body(Body::from(body.to_string()))
    .expect("build request");
  send(app, request).await
}
