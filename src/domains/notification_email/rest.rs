use axum::{
  body::Bytes,
  extract::State,
  http::HeaderMap,
  response::Json as JsonResponse,
  routing::get,
  Router,
};

use super::model::{EmailsUpdatedResponse, NotificationEmail, NotificationEmailPayload};
use crate::{
  middleware::auth::{check_guards, Guard},
  state::{AppState, SharedAppState},
  AppError,
};

pub fn notification_email_routes() -> Router<SharedAppState> {
  Router::new().route(
    "/notification-emails",
    get(list_emails_handler).post(replace_emails_handler),
  )
}

pub async fn list_emails_handler(
  State(state): State<SharedAppState>,
  headers: HeaderMap,
) -> Result<JsonResponse<Vec<NotificationEmail>>, AppError> {
  let claims = check_guards(
    &headers,
    state.jwt_secret(),
    &[Guard::Authenticated, Guard::Authorized(state.service_name())],
  )
  .await?;

  state
    .list_emails(claims.customer_id)
    .await
    .map(JsonResponse)
    .map_err(Into::into)
}

/// The body is parsed only after the guards pass.
pub async fn replace_emails_handler(
  State(state): State<SharedAppState>,
  headers: HeaderMap,
  body: Bytes,
) -> Result<JsonResponse<EmailsUpdatedResponse>, AppError> {
  let claims = check_guards(
    &headers,
    state.jwt_secret(),
    &[Guard::Authenticated, Guard::Authorized(state.service_name()), Guard::Admin],
  )
  .await?;

  let payloads: Vec<NotificationEmailPayload> = serde_json::from_slice(&body)?;
  let ids = state.replace_emails(claims.customer_id, payloads).await?;

  Ok(JsonResponse(EmailsUpdatedResponse::new(ids)))
}
