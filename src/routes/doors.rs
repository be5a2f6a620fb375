//! Door command endpoints
//!
//! - POST /api/doors/first  - open the first door
//! - POST /api/doors/second - open the second door
//! - POST /api/doors/both   - open both doors (one controller endpoint)
//!
//! Each endpoint requires a valid session (cookie or bearer token) and
//! returns the command outcome as JSON. A failed *command* is still a 200:
//! the request was handled, and the outcome body carries the failure
//! classification for the shell to render.

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use std::sync::Arc;
use tracing::info;

use crate::auth::token_from_cookie_header;
use crate::controller::DoorEndpoint;
use crate::routes::{auth_routes::MessageResponse, json_response};
use crate::server::AppState;

/// Extract the session token from the request: bearer header first, then
/// the session cookie.
pub fn session_token(req: &Request<Incoming>) -> Option<&str> {
    let bearer = req
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));
    if bearer.is_some() {
        return bearer;
    }

    req.headers()
        .get("cookie")
        .and_then(|h| h.to_str().ok())
        .and_then(token_from_cookie_header)
}

/// Handle a door command request after routing resolved the endpoint
pub async fn handle_door_command(
    req: Request<Incoming>,
    state: Arc<AppState>,
    endpoint: DoorEndpoint,
) -> Response<Full<Bytes>> {
    let authenticated = session_token(&req)
        .map(|token| state.tokens.verify(token).is_some())
        .unwrap_or(false);

    if !authenticated {
        // Session failures never retry; the shell redirects to login
        return json_response(
            StatusCode::UNAUTHORIZED,
            &MessageResponse {
                message: "Authentication required".to_string(),
            },
        );
    }

    info!(endpoint = endpoint.label(), "Door command accepted");
    let outcome = state.controller.send_command(endpoint).await;

    json_response(StatusCode::OK, &outcome)
}

/// Resolve a door name from the URL path segment
pub fn endpoint_from_name(name: &str) -> Option<DoorEndpoint> {
    match name {
        "first" => Some(DoorEndpoint::FirstDoor),
        "second" => Some(DoorEndpoint::SecondDoor),
        "both" => Some(DoorEndpoint::BothDoors),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn door_names_resolve() {
        assert_eq!(endpoint_from_name("first"), Some(DoorEndpoint::FirstDoor));
        assert_eq!(endpoint_from_name("second"), Some(DoorEndpoint::SecondDoor));
        assert_eq!(endpoint_from_name("both"), Some(DoorEndpoint::BothDoors));
        assert_eq!(endpoint_from_name("third"), None);
        assert_eq!(endpoint_from_name(""), None);
    }
}
