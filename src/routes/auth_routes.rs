//! Authentication endpoints
//!
//! - POST /api/auth/login  - check the shared password, issue a session token
//! - POST /api/auth/logout - destroy the session cookie

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::{check_password, clear_cookie, session_cookie, TokenService};
use crate::routes::json_response;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

/// POST /api/auth/login
pub async fn handle_login(req: Request<Incoming>, state: Arc<AppState>) -> Response<Full<Bytes>> {
    let body = match req.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!("Login request body error: {}", e);
            return json_response(
                StatusCode::BAD_REQUEST,
                &MessageResponse {
                    message: "Failed to read request body".to_string(),
                },
            );
        }
    };

    login_response(
        &state.tokens,
        state.args.admin_password(),
        state.args.secure_cookies(),
        &body,
    )
}

/// Build the login response from the raw request body.
///
/// Split out from the handler so the status-code contract is unit-testable
/// without a live connection.
pub fn login_response(
    tokens: &TokenService,
    admin_password: Option<&str>,
    secure_cookies: bool,
    body: &[u8],
) -> Response<Full<Bytes>> {
    // A body that is not valid JSON is an unexpected failure, not a missing
    // field: the shell always posts JSON.
    let request: LoginRequest = match serde_json::from_slice(body) {
        Ok(r) => r,
        Err(e) => {
            warn!("Login request parse error: {}", e);
            return json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &MessageResponse {
                    message: "An unexpected error occurred".to_string(),
                },
            );
        }
    };

    if request.password.is_empty() {
        return json_response(
            StatusCode::BAD_REQUEST,
            &MessageResponse {
                message: "Password is required".to_string(),
            },
        );
    }

    if !check_password(&request.password, admin_password) {
        info!("Login rejected: invalid password");
        return json_response(
            StatusCode::UNAUTHORIZED,
            &MessageResponse {
                message: "Invalid password".to_string(),
            },
        );
    }

    let token = match tokens.issue() {
        Ok(t) => t,
        Err(e) => {
            warn!("Token issuance failed: {}", e);
            return json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &MessageResponse {
                    message: "An unexpected error occurred".to_string(),
                },
            );
        }
    };

    info!("Operator authenticated, session issued");

    let body = LoginResponse {
        token: token.clone(),
        message: "Authentication successful".to_string(),
    };

    let mut response = json_response(StatusCode::OK, &body);
    if let Ok(value) = session_cookie(&token, secure_cookies).parse() {
        response.headers_mut().insert("Set-Cookie", value);
    }
    response
}

/// POST /api/auth/logout
pub fn handle_logout(state: &AppState) -> Response<Full<Bytes>> {
    let mut response = json_response(
        StatusCode::OK,
        &SuccessResponse {
            success: true,
            message: "Logged out".to_string(),
        },
    );
    if let Ok(value) = clear_cookie(state.args.secure_cookies()).parse() {
        response.headers_mut().insert("Set-Cookie", value);
    }
    response
}
