use axum::http::HeaderMap;

use crate::utils::error::AppError;
use crate::utils::jwt::Claims;

/// One check of the chain a handler runs before its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard<'a> {
  Authenticated,
  Authorized(&'a str),
  Admin,
}

pub async fn auth_middleware(headers: &HeaderMap, secret: &str) -> Result<Claims, AppError> {
  let auth_header = headers
    .get(axum::http::header::AUTHORIZATION)
    .ok_or_else(|| AppError::unauthorized("Authorization header missing"))?
    .to_str()
    .map_err(|_| AppError::unauthorized("Invalid authorization header"))?;

  let token = auth_header
    .strip_prefix("Bearer ")
    .ok_or_else(|| AppError::unauthorized("Invalid authorization format"))?;

  let claims = crate::utils::jwt::decode_jwt(token, secret).map_err(|_| AppError::unauthorized("Invalid token"))?;

  Ok(claims)
}

/// Runs `guards` in order and stops at the first rejection.
///
/// The chain must start with [`Guard::Authenticated`]; the later guards
/// inspect the claims it produced.
pub async fn check_guards(headers: &HeaderMap, secret: &str, guards: &[Guard<'_>]) -> Result<Claims, AppError> {
  let mut claims: Option<Claims> = None;

  for guard in guards {
    match guard {
      Guard::Authenticated => {
        claims = Some(auth_middleware(headers, secret).await?);
      }
      Guard::Authorized(service) => {
        let current = claims.as_ref().ok_or_else(|| AppError::unauthorized("Not authenticated"))?;
        if !current.services.iter().any(|s| s.as_str() == *service) {
          return Err(AppError::forbidden(format!("Not authorized for service {}", service)));
        }
      }
      Guard::Admin => {
        let current = claims.as_ref().ok_or_else(|| AppError::unauthorized("Not authenticated"))?;
        if !current.admin {
          return Err(AppError::forbidden("Administrator privileges required"));
        }
      }
    }
  }

  claims.ok_or_else(|| AppError::unauthorized("Not authenticated"))
}
