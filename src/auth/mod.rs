//! Authentication for Gatehouse
//!
//! Provides:
//! - Session token issuance and verification (HS256 over the shared secret)
//! - The shared admin password check
//! - Session cookie construction and parsing

pub mod cookie;
pub mod password;
pub mod token;

pub use cookie::{clear_cookie, session_cookie, token_from_cookie_header, SESSION_COOKIE};
pub use password::check_password;
pub use token::{Claims, TokenService, TOKEN_TTL_SECS};
