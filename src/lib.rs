//! Dividend Hunter Assistant
//!
//! A conversational front-end over the Sectors financial-data API:
//! - A Groq-hosted chat model decides per turn which data-fetching tool
//!   to invoke for a natural-language question
//! - Four fixed tools cover top dividend yields and per-company overview,
//!   financials, and dividend reports
//! - Per-session, append-only conversation memory provides cross-turn
//!   context
//! - Transport and HTTP failures are soft: they become structured tool
//!   results the model explains conversationally
//!
//! TURN LOOP:
//! COMPOSE → MODEL CALL → TOOL DISPATCH → (repeat) → FINALIZE

pub mod agent;
pub mod api;
pub mod config;
pub mod error;
pub mod groq;
pub mod memory;
pub mod models;
pub mod sectors;
pub mod tools;

pub use error::Result;

// Re-export common types
pub use config::Secrets;
pub use models::*;
