//! Page shell
//!
//! Thin UI layer: a login form and a dashboard with the door trigger. Both
//! pages are embedded at build time and served only after the session gate
//! has run. The shell's own cookie check is advisory (UX responsiveness),
//! never the security boundary.

use bytes::Bytes;
use http_body_util::Full;
use hyper::Response;

use crate::routes::html_response;

/// GET /login
pub fn login_page() -> Response<Full<Bytes>> {
    html_response(include_str!("../../static/login.html"))
}

/// GET /dashboard
pub fn dashboard_page() -> Response<Full<Bytes>> {
    html_response(include_str!("../../static/dashboard.html"))
}
