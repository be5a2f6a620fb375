//! HTTP server implementation
//!
//! hyper http1 with TokioIo for async handling; one spawned task per
//! connection, hand-rolled routing over (method, path).

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::auth::{token_from_cookie_header, TokenService};
use crate::config::Args;
use crate::controller::{ControllerClient, ControllerConfig};
use crate::gate::{self, GateDecision, DASHBOARD_PATH, LOGIN_PATH};
use crate::routes::{self, not_found_response, redirect};
use crate::types::Result;

/// Shared application state
pub struct AppState {
    pub args: Args,
    /// Session token issue/verify over the shared secret
    pub tokens: TokenService,
    /// Outbound client for the door controller
    pub controller: ControllerClient,
}

impl AppState {
    pub fn new(args: Args) -> Result<Self> {
        let tokens = TokenService::new(args.session_secret())?;
        let controller = ControllerClient::new(ControllerConfig::from_args(&args))?;

        Ok(Self {
            args,
            tokens,
            controller,
        })
    }
}

/// Start the HTTP server
pub async fn run(state: Arc<AppState>) -> Result<()> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!("Gatehouse listening on {}", state.args.listen);
    if state.args.dev_mode {
        warn!("Development mode enabled - insecure credential fallbacks in use");
    }

    serve(listener, state).await
}

/// Accept loop over an already-bound listener
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { Ok::<_, Infallible>(handle_request(state, req).await) }
                    });

                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        debug!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Whether the request carries a valid session cookie
fn session_is_valid(state: &AppState, req: &Request<Incoming>) -> bool {
    req.headers()
        .get("cookie")
        .and_then(|h| h.to_str().ok())
        .and_then(token_from_cookie_header)
        .map(|token| state.tokens.verify(token).is_some())
        .unwrap_or(false)
}

/// Route incoming HTTP requests
async fn handle_request(state: Arc<AppState>, req: Request<Incoming>) -> Response<Full<Bytes>> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    debug!("{} {}", method, path);

    // Authoritative session gate: runs before any page content is produced.
    // API routes handle their own auth (401 JSON instead of a redirect).
    if method == Method::GET {
        let valid = session_is_valid(&state, &req);
        match gate::evaluate(gate::classify(&path), valid) {
            GateDecision::RedirectToLogin => return redirect(LOGIN_PATH),
            GateDecision::RedirectToDashboard => return redirect(DASHBOARD_PATH),
            GateDecision::Pass => {}
        }
    }

    match (method, path.as_str()) {
        // Pages
        (Method::GET, "/") => {
            // Root has no content of its own; land on whichever page the
            // session allows
            if session_is_valid(&state, &req) {
                redirect(DASHBOARD_PATH)
            } else {
                redirect(LOGIN_PATH)
            }
        }
        (Method::GET, "/login") => routes::login_page(),
        (Method::GET, "/dashboard") => routes::dashboard_page(),

        // Auth API
        (Method::POST, "/api/auth/login") => routes::handle_login(req, state).await,
        (Method::POST, "/api/auth/logout") => routes::handle_logout(&state),

        // Door commands
        (Method::POST, p) if p.starts_with("/api/doors/") => {
            let name = p.strip_prefix("/api/doors/").unwrap_or("");
            match routes::doors::endpoint_from_name(name) {
                Some(endpoint) => routes::handle_door_command(req, state, endpoint).await,
                None => not_found_response(p),
            }
        }

        // Liveness probe and build info
        (Method::GET, "/health") | (Method::GET, "/healthz") => routes::health_check(),
        (Method::GET, "/version") => routes::version_info(),

        _ => not_found_response(&path),
    }
}
