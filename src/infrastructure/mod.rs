//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Gemini, Imagen, ElevenLabs: provider clients behind the outbound ports
//! - Composer: simulated video composition
//! - Persistence: in-memory story storage
//! - HTTP: REST API routes
//! - Config: Application configuration
//! - State: Shared application state

pub mod composer;
pub mod config;
pub mod elevenlabs;
pub mod gemini;
pub mod http;
pub mod imagen;
pub mod persistence;
pub mod state;
