//! Session cookie helpers
//!
//! The serialized token lives in a site-wide cookie owned by the browser.
//! The cookie is intentionally *not* HttpOnly: the page shell reads it for
//! an advisory redirect-on-load check. The authoritative check is always
//! the server-side gate.

use crate::auth::token::TOKEN_TTL_SECS;

/// Fixed session cookie name
pub const SESSION_COOKIE: &str = "gatehouse-session";

/// Build the Set-Cookie value for a freshly issued session token
pub fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; Max-Age={TOKEN_TTL_SECS}; SameSite=Strict"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the Set-Cookie value that destroys the session cookie
pub fn clear_cookie(secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}=; Path=/; Max-Age=0; SameSite=Strict");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Extract the session token from a Cookie request header, if present
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then_some(value)
    })
}
