//! Configuration for Gatehouse
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

/// Insecure fallbacks used only in dev mode. Shipping these to production is
/// exactly the failure mode the startup validation exists to prevent.
pub const DEV_SESSION_SECRET: &str = "dev-only-insecure-secret";
pub const DEV_ADMIN_PASSWORD: &str = "dev-only-password";
pub const DEV_CONTROLLER_API_KEY: &str = "dev-only-api-key";

/// Gatehouse - authenticated web gateway for the workshop door controller
#[derive(Parser, Debug, Clone)]
#[command(name = "gatehouse")]
#[command(about = "Authenticated web gateway for the workshop door controller")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Shared secret for session token signing (required in production)
    #[arg(long, env = "SESSION_SECRET")]
    pub session_secret: Option<String>,

    /// Admin password for the single-operator login (required in production)
    #[arg(long, env = "ADMIN_PASSWORD")]
    pub admin_password: Option<String>,

    /// Base URL of the door controller
    #[arg(long, env = "CONTROLLER_URL", default_value = "http://192.168.2.40")]
    pub controller_url: String,

    /// Static API key the controller expects (required in production)
    #[arg(long, env = "CONTROLLER_API_KEY")]
    pub controller_api_key: Option<String>,

    /// Per-command timeout in milliseconds
    #[arg(long, env = "COMMAND_TIMEOUT_MS", default_value = "10000")]
    pub command_timeout_ms: u64,

    /// Retries after a transport-level failure (non-2xx responses are never retried)
    #[arg(long, env = "COMMAND_RETRIES", default_value = "0")]
    pub command_retries: u32,

    /// Flat delay between retries in milliseconds
    #[arg(long, env = "RETRY_DELAY_MS", default_value = "1000")]
    pub retry_delay_ms: u64,

    /// Enable development mode (insecure credential fallbacks, non-Secure cookies)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Effective token-signing secret (insecure default only in dev mode)
    pub fn session_secret(&self) -> &str {
        match self.session_secret.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => DEV_SESSION_SECRET,
        }
    }

    /// Effective admin password, if any is configured
    pub fn admin_password(&self) -> Option<&str> {
        match self.admin_password.as_deref() {
            Some(p) if !p.is_empty() => Some(p),
            _ if self.dev_mode => Some(DEV_ADMIN_PASSWORD),
            _ => None,
        }
    }

    /// Effective controller API key (insecure default only in dev mode)
    pub fn controller_api_key(&self) -> &str {
        match self.controller_api_key.as_deref() {
            Some(k) if !k.is_empty() => k,
            _ => DEV_CONTROLLER_API_KEY,
        }
    }

    /// Whether session cookies should carry the Secure attribute
    pub fn secure_cookies(&self) -> bool {
        !self.dev_mode
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Validate configuration. Missing credentials are a hard startup error
    /// outside dev mode — the service fails closed rather than shipping a
    /// known default secret.
    pub fn validate(&self) -> Result<(), String> {
        if !self.dev_mode {
            if self.session_secret.as_deref().map_or(true, str::is_empty) {
                return Err("SESSION_SECRET is required in production mode".to_string());
            }
            if self.admin_password.as_deref().map_or(true, str::is_empty) {
                return Err("ADMIN_PASSWORD is required in production mode".to_string());
            }
            if self.controller_api_key.as_deref().map_or(true, str::is_empty) {
                return Err("CONTROLLER_API_KEY is required in production mode".to_string());
            }
        }

        if self.command_timeout_ms == 0 {
            return Err("COMMAND_TIMEOUT_MS must be greater than zero".to_string());
        }

        Ok(())
    }
}
