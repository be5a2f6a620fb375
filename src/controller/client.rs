//! HTTP client for the door controller
//!
//! One outbound GET per command, a per-attempt timeout, and a bounded
//! flat-delay retry for transport-level failures. Non-2xx responses are
//! terminal: the controller answered, so retrying would not help.
//!
//! The API key travels both as a bearer header and as a `key` query
//! parameter. The controller firmware accepts either; the duplication is a
//! preserved compatibility contract, not an accident.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Args;
use crate::types::GatehouseError;

/// Flat delay between retries. The controller is a LAN device that is either
/// reachable immediately or down, so exponential backoff buys nothing.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Default per-command timeout
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// The fixed set of controller command endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorEndpoint {
    FirstDoor,
    SecondDoor,
    /// One controller-side endpoint; the firmware sequences the servos.
    /// The client never orchestrates two calls for this.
    BothDoors,
}

impl DoorEndpoint {
    /// Path on the controller's HTTP API
    pub fn path(self) -> &'static str {
        match self {
            DoorEndpoint::FirstDoor => "/openFirstDoor",
            DoorEndpoint::SecondDoor => "/openSecondDoor",
            DoorEndpoint::BothDoors => "/openBothDoors",
        }
    }

    /// Short label for logging
    pub fn label(self) -> &'static str {
        match self {
            DoorEndpoint::FirstDoor => "first door",
            DoorEndpoint::SecondDoor => "second door",
            DoorEndpoint::BothDoors => "both doors",
        }
    }
}

/// Failure classification for a door command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandErrorKind {
    /// Transport unreachable (connection refused, DNS failure, reset)
    Network,
    /// Controller answered with a non-auth application error
    Server,
    /// Controller rejected the API key (401/403)
    Unauthorized,
    /// Deadline exceeded; the in-flight request was aborted
    Timeout,
    /// Uncategorized failure; never retried
    Unknown,
}

impl CommandErrorKind {
    /// Whether another attempt may succeed
    fn retryable(self) -> bool {
        matches!(self, CommandErrorKind::Network | CommandErrorKind::Timeout)
    }
}

/// Result of a door command, as surfaced to the UI
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandOutcome {
    pub success: bool,
    pub message: String,
    /// Present iff `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<CommandErrorKind>,
}

impl CommandOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error_type: None,
        }
    }

    pub fn fail(kind: CommandErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error_type: Some(kind),
        }
    }
}

/// Controller client configuration
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Base URL of the controller, e.g. `http://192.168.2.40`
    pub base_url: String,
    /// Static API key the controller expects
    pub api_key: String,
    /// Per-attempt timeout; the request is aborted once exceeded
    pub timeout: Duration,
    /// Retries after a transport-level failure
    pub max_retries: u32,
    /// Flat delay between attempts
    pub retry_delay: Duration,
}

impl ControllerConfig {
    pub fn from_args(args: &Args) -> Self {
        Self {
            base_url: args.controller_url.trim_end_matches('/').to_string(),
            api_key: args.controller_api_key().to_string(),
            timeout: args.command_timeout(),
            max_retries: args.command_retries,
            retry_delay: args.retry_delay(),
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://192.168.2.40".to_string(),
            api_key: String::new(),
            timeout: DEFAULT_COMMAND_TIMEOUT,
            max_retries: 0,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// Outcome of a single attempt, before retry policy is applied
enum Attempt {
    /// Terminal: success or a non-retryable failure
    Done(CommandOutcome),
    /// Transport-level failure worth retrying
    Retryable(CommandErrorKind, String),
}

/// Client for the door controller's command API
pub struct ControllerClient {
    config: ControllerConfig,
    http_client: reqwest::Client,
}

impl ControllerClient {
    pub fn new(config: ControllerConfig) -> Result<Self, GatehouseError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatehouseError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Open the first door
    pub async fn open_first_door(&self) -> CommandOutcome {
        self.send_command(DoorEndpoint::FirstDoor).await
    }

    /// Open the second door
    pub async fn open_second_door(&self) -> CommandOutcome {
        self.send_command(DoorEndpoint::SecondDoor).await
    }

    /// Open both doors (single controller endpoint)
    pub async fn open_both_doors(&self) -> CommandOutcome {
        self.send_command(DoorEndpoint::BothDoors).await
    }

    /// Issue a command to the controller, retrying transport failures with a
    /// flat delay until the configured retry budget is spent.
    pub async fn send_command(&self, endpoint: DoorEndpoint) -> CommandOutcome {
        let url = format!(
            "{}{}?key={}",
            self.config.base_url,
            endpoint.path(),
            self.config.api_key
        );

        let mut retries_left = self.config.max_retries;
        loop {
            match self.attempt(&url).await {
                Attempt::Done(outcome) => return outcome,
                Attempt::Retryable(kind, message) => {
                    if retries_left == 0 {
                        warn!(
                            endpoint = endpoint.label(),
                            kind = ?kind,
                            "Door command failed after exhausting retries"
                        );
                        return CommandOutcome::fail(kind, message);
                    }
                    debug!(
                        endpoint = endpoint.label(),
                        kind = ?kind,
                        retries_left,
                        "Door command attempt failed, retrying after flat delay"
                    );
                    retries_left -= 1;
                    tokio::time::sleep(self.config.retry_delay).await;
                }
            }
        }
    }

    async fn attempt(&self, url: &str) -> Attempt {
        let response = self
            .http_client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Cache-Control", "no-store")
            .send()
            .await;

        match response {
            Ok(resp) => {
                let status = resp.status();
                if status.is_success() {
                    // Controller bodies are short plain-text acknowledgements
                    match resp.text().await {
                        Ok(text) => Attempt::Done(CommandOutcome::ok(text)),
                        Err(e) => classify_transport_error(&e),
                    }
                } else {
                    let kind = if status == reqwest::StatusCode::UNAUTHORIZED
                        || status == reqwest::StatusCode::FORBIDDEN
                    {
                        CommandErrorKind::Unauthorized
                    } else {
                        CommandErrorKind::Server
                    };

                    let detail = match resp.text().await {
                        Ok(body) if !body.is_empty() => body,
                        _ => status
                            .canonical_reason()
                            .unwrap_or("unknown status")
                            .to_string(),
                    };

                    // The controller answered; retrying the same request
                    // would produce the same rejection.
                    Attempt::Done(CommandOutcome::fail(
                        kind,
                        format!("Failed to communicate with door system: {detail}"),
                    ))
                }
            }
            Err(e) => classify_transport_error(&e),
        }
    }
}

/// Map a reqwest error to the command failure taxonomy
fn classify_transport_error(e: &reqwest::Error) -> Attempt {
    let kind = if e.is_timeout() {
        CommandErrorKind::Timeout
    } else if e.is_connect() || e.is_request() || e.is_body() {
        CommandErrorKind::Network
    } else {
        CommandErrorKind::Unknown
    };

    let message = match kind {
        CommandErrorKind::Timeout => {
            "The request timed out. The door controller may be offline or unreachable.".to_string()
        }
        CommandErrorKind::Network => {
            "Network connection error. Please check your connection and try again.".to_string()
        }
        _ => "An unexpected error occurred. Please try again or contact support.".to_string(),
    };

    if kind.retryable() {
        Attempt::Retryable(kind, message)
    } else {
        Attempt::Done(CommandOutcome::fail(kind, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http_body_util::Full;
    use hyper::server::conn::http1;
    use hyper::service::service_fn;
    use hyper::{Request, Response, StatusCode};
    use hyper_util::rt::TokioIo;
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::net::TcpListener;
    use tokio::sync::Mutex;

    /// What the mock controller saw on the last request
    #[derive(Default)]
    struct Seen {
        uri: String,
        auth: Option<String>,
    }

    /// Spawn a loopback controller that answers every request with the given
    /// status and body, counting requests as they arrive.
    async fn spawn_controller(
        status: StatusCode,
        body: &'static str,
    ) -> (SocketAddr, Arc<AtomicUsize>, Arc<Mutex<Seen>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Seen::default()));

        let task_hits = Arc::clone(&hits);
        let task_seen = Arc::clone(&seen);
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let hits = Arc::clone(&task_hits);
                let seen = Arc::clone(&task_seen);
                tokio::spawn(async move {
                    let service = service_fn(move |req: Request<hyper::body::Incoming>| {
                        let hits = Arc::clone(&hits);
                        let seen = Arc::clone(&seen);
                        async move {
                            hits.fetch_add(1, Ordering::SeqCst);
                            let mut guard = seen.lock().await;
                            guard.uri = req.uri().to_string();
                            guard.auth = req
                                .headers()
                                .get("authorization")
                                .and_then(|h| h.to_str().ok())
                                .map(|s| s.to_string());
                            drop(guard);

                            Ok::<_, hyper::Error>(
                                Response::builder()
                                    .status(status)
                                    .body(Full::new(Bytes::from_static(body.as_bytes())))
                                    .unwrap(),
                            )
                        }
                    });
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        (addr, hits, seen)
    }

    /// Spawn a listener that accepts and immediately closes every connection,
    /// producing a transport-level failure on each attempt.
    async fn spawn_slammer() -> (SocketAddr, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));

        let task_hits = Arc::clone(&hits);
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                task_hits.fetch_add(1, Ordering::SeqCst);
                drop(stream);
            }
        });

        (addr, hits)
    }

    /// Spawn a listener that accepts connections but never responds, so the
    /// client's deadline fires.
    async fn spawn_black_hole() -> (SocketAddr, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));

        let task_hits = Arc::clone(&hits);
        tokio::spawn(async move {
            let mut held = Vec::new();
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                task_hits.fetch_add(1, Ordering::SeqCst);
                // Hold the socket open without ever answering
                held.push(stream);
            }
        });

        (addr, hits)
    }

    fn client_for(addr: SocketAddr, max_retries: u32, timeout_ms: u64) -> ControllerClient {
        ControllerClient::new(ControllerConfig {
            base_url: format!("http://{addr}"),
            api_key: "test-key".to_string(),
            timeout: Duration::from_millis(timeout_ms),
            max_retries,
            retry_delay: Duration::from_millis(25),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn success_returns_body_text() {
        let (addr, hits, _) = spawn_controller(StatusCode::OK, "OK").await;
        let client = client_for(addr, 2, 1000);

        let outcome = client.send_command(DoorEndpoint::FirstDoor).await;

        assert!(outcome.success);
        assert_eq!(outcome.message, "OK");
        assert!(outcome.error_type.is_none());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn api_key_sent_as_header_and_query() {
        let (addr, _, seen) = spawn_controller(StatusCode::OK, "OK").await;
        let client = client_for(addr, 0, 1000);

        client.send_command(DoorEndpoint::BothDoors).await;

        let guard = seen.lock().await;
        assert!(guard.uri.starts_with("/openBothDoors"));
        assert!(guard.uri.contains("key=test-key"));
        assert_eq!(guard.auth.as_deref(), Some("Bearer test-key"));
    }

    #[tokio::test]
    async fn unauthorized_is_terminal_with_single_attempt() {
        let (addr, hits, _) = spawn_controller(StatusCode::UNAUTHORIZED, "bad key").await;
        let client = client_for(addr, 2, 1000);

        let outcome = client.send_command(DoorEndpoint::SecondDoor).await;

        assert!(!outcome.success);
        assert_eq!(outcome.error_type, Some(CommandErrorKind::Unauthorized));
        assert!(outcome.message.contains("bad key"));
        // Non-2xx must never be retried
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn forbidden_also_maps_to_unauthorized() {
        let (addr, hits, _) = spawn_controller(StatusCode::FORBIDDEN, "").await;
        let client = client_for(addr, 2, 1000);

        let outcome = client.send_command(DoorEndpoint::FirstDoor).await;

        assert_eq!(outcome.error_type, Some(CommandErrorKind::Unauthorized));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn server_error_is_terminal_and_carries_body() {
        let (addr, hits, _) = spawn_controller(StatusCode::INTERNAL_SERVER_ERROR, "servo jam").await;
        let client = client_for(addr, 2, 1000);

        let outcome = client.send_command(DoorEndpoint::FirstDoor).await;

        assert!(!outcome.success);
        assert_eq!(outcome.error_type, Some(CommandErrorKind::Server));
        assert!(outcome.message.contains("servo jam"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_error_body_falls_back_to_status_text() {
        let (addr, _, _) = spawn_controller(StatusCode::SERVICE_UNAVAILABLE, "").await;
        let client = client_for(addr, 0, 1000);

        let outcome = client.send_command(DoorEndpoint::FirstDoor).await;

        assert_eq!(outcome.error_type, Some(CommandErrorKind::Server));
        assert!(outcome.message.contains("Service Unavailable"));
    }

    #[tokio::test]
    async fn transport_failure_retries_then_reports_network() {
        let (addr, hits) = spawn_slammer().await;
        let client = client_for(addr, 2, 1000);

        let start = std::time::Instant::now();
        let outcome = client.send_command(DoorEndpoint::FirstDoor).await;
        let elapsed = start.elapsed();

        assert!(!outcome.success);
        assert_eq!(outcome.error_type, Some(CommandErrorKind::Network));
        // 1 initial attempt + 2 retries
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        // Two flat delays between the three attempts
        assert!(elapsed >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn timeout_classified_and_retried() {
        let (addr, hits) = spawn_black_hole().await;
        let client = client_for(addr, 1, 100);

        let outcome = client.send_command(DoorEndpoint::FirstDoor).await;

        assert!(!outcome.success);
        assert_eq!(outcome.error_type, Some(CommandErrorKind::Timeout));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn connection_refused_reports_network() {
        // Bind then drop so the port is very likely unoccupied
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(addr, 0, 1000);
        let outcome = client.send_command(DoorEndpoint::FirstDoor).await;

        assert!(!outcome.success);
        assert_eq!(outcome.error_type, Some(CommandErrorKind::Network));
    }

    #[tokio::test]
    async fn thin_bindings_map_to_fixed_endpoints() {
        let (addr, _, seen) = spawn_controller(StatusCode::OK, "OK").await;
        let client = client_for(addr, 0, 1000);

        client.open_first_door().await;
        assert!(seen.lock().await.uri.starts_with("/openFirstDoor"));

        client.open_second_door().await;
        assert!(seen.lock().await.uri.starts_with("/openSecondDoor"));

        client.open_both_doors().await;
        assert!(seen.lock().await.uri.starts_with("/openBothDoors"));
    }

    #[test]
    fn outcome_serializes_with_camel_case_error_type() {
        let outcome = CommandOutcome::fail(CommandErrorKind::Timeout, "late");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["errorType"], "timeout");

        let ok = CommandOutcome::ok("OK");
        let json = serde_json::to_value(&ok).unwrap();
        assert!(json.get("errorType").is_none());
    }
}
