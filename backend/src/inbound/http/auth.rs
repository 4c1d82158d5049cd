//! Sign-in and sign-out handlers.
//!
//! ```text
//! POST /api/v1/login {"username":"jane","password":"…","rememberDevice":true,"deviceId":"kitchen-tablet"}
//! POST /api/v1/login/pin {"deviceId":"kitchen-tablet","pin":"2468"}
//! POST /api/v1/logout
//! ```
//!
//! Both sign-in endpoints answer with the `AuthResult` JSON shape. Failures
//! never say whether the username exists or why verification failed.

use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, post, web};
use serde::Deserialize;
use tracing::info;
use zeroize::Zeroizing;

use crate::domain::{AuthErrorCode, AuthResult, RawCredential};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/v1/login`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub remember_device: bool,
    #[serde(default)]
    pub device_id: Option<String>,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("remember_device", &self.remember_device)
            .finish_non_exhaustive()
    }
}

impl From<LoginRequest> for RawCredential {
    fn from(value: LoginRequest) -> Self {
        RawCredential::Password {
            username: value.username,
            password: Zeroizing::new(value.password),
            remember_device: value.remember_device,
            device_id: value.device_id,
        }
    }
}

/// Request body for `POST /api/v1/login/pin`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinLoginRequest {
    pub device_id: String,
    pub pin: String,
}

impl fmt::Debug for PinLoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinLoginRequest").finish_non_exhaustive()
    }
}

impl From<PinLoginRequest> for RawCredential {
    fn from(value: PinLoginRequest) -> Self {
        RawCredential::Pin {
            device_id: value.device_id,
            pin: Zeroizing::new(value.pin),
        }
    }
}

fn status_for(code: AuthErrorCode) -> StatusCode {
    match code {
        AuthErrorCode::InvalidFormat => StatusCode::BAD_REQUEST,
        AuthErrorCode::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthErrorCode::AccountLocked => StatusCode::LOCKED,
        AuthErrorCode::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
    }
}

async fn sign_in(
    state: &HttpState,
    session: &SessionContext,
    credential: RawCredential,
) -> ApiResult<HttpResponse> {
    let result = state.login.authenticate_raw(credential).await?;
    let status = match &result {
        AuthResult::Success(user) => {
            session.establish(user.user_id())?;
            StatusCode::OK
        }
        AuthResult::Failure(failure) => status_for(failure.error_code()),
    };
    Ok(HttpResponse::build(status).json(result))
}

/// Authenticate with username and password and establish a session.
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    sign_in(&state, &session, payload.into_inner().into()).await
}

/// Authenticate with a remembered device's PIN and establish a session.
#[post("/login/pin")]
pub async fn login_pin(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PinLoginRequest>,
) -> ApiResult<HttpResponse> {
    sign_in(&state, &session, payload.into_inner().into()).await
}

/// End the current session.
#[post("/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    if let Some(user_id) = session.user_id()? {
        info!(%user_id, "signed out");
    }
    session.end();
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
