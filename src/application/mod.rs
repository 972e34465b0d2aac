//! Application layer - Gateway services, wizard state machine and ports
//!
//! This layer contains:
//! - Ports: traits the providers and storage must implement
//! - Services: outline, storyboard, narration and composition gateways,
//!   the progress estimator and the wizard state machine
//! - DTOs: wire shapes for the HTTP API

pub mod dto;
pub mod ports;
pub mod services;
