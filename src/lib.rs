//! Gatehouse - authenticated web gateway for the workshop door controller
//!
//! Gatehouse serves a password-gated dashboard and relays door-open commands
//! to a small ESP32 controller on the LAN.
//!
//! ## Components
//!
//! - **Token service**: HS256-signed, 7-day session tokens from a shared secret
//! - **Session gate**: authoritative pre-request redirect enforcement for pages
//! - **Controller client**: outbound HTTP commands with timeout, bounded
//!   flat-delay retry and structured failure classification
//! - **Routes**: login/logout, door commands, page shell, health probes

pub mod auth;
pub mod config;
pub mod controller;
pub mod gate;
pub mod routes;
pub mod server;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{GatehouseError, Result};
