//! Session gate
//!
//! Authoritative pre-request check for page routes. Classifies each path by
//! prefix and decides whether the request passes through or gets redirected,
//! before any protected content is produced. The page shell's own cookie
//! check is advisory only; this gate is the security boundary.

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Paths that require a valid session
const PROTECTED_PREFIXES: &[&str] = &["/dashboard"];
/// Paths that should bounce an already-authenticated operator to the dashboard
const AUTH_ONLY_PREFIXES: &[&str] = &["/login"];

/// Route classification by path prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Requires a valid session
    Protected,
    /// Login page: only useful without a session
    AuthOnly,
    /// No gate enforcement
    Public,
}

/// Outcome of the gate check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Serve the request unchanged
    Pass,
    /// 302 to the login page
    RedirectToLogin,
    /// 302 to the dashboard
    RedirectToDashboard,
}

/// Classify a request path by prefix
pub fn classify(path: &str) -> RouteClass {
    if PROTECTED_PREFIXES.iter().any(|p| path.starts_with(p)) {
        RouteClass::Protected
    } else if AUTH_ONLY_PREFIXES.iter().any(|p| path.starts_with(p)) {
        RouteClass::AuthOnly
    } else {
        RouteClass::Public
    }
}

/// Decide what to do with a request given its class and session validity
pub fn evaluate(class: RouteClass, has_valid_session: bool) -> GateDecision {
    match (class, has_valid_session) {
        (RouteClass::Protected, false) => GateDecision::RedirectToLogin,
        (RouteClass::AuthOnly, true) => GateDecision::RedirectToDashboard,
        _ => GateDecision::Pass,
    }
}
