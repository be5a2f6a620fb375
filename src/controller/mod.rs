//! Door controller gateway
//!
//! Outbound HTTP client for the physical door-access controller, with
//! timeout, bounded flat-delay retry and structured failure classification.

pub mod client;

pub use client::{
    CommandErrorKind, CommandOutcome, ControllerClient, ControllerConfig, DoorEndpoint,
};
