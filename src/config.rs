//! Secret configuration loaded at process start
//!
//! Two secrets drive the whole system: the Sectors data-API key and the
//! Groq model-API key. A missing secret is fatal at startup.

use crate::error::AgentError;
use crate::Result;
use std::env;

/// API secrets for the data and model providers
#[derive(Debug, Clone)]
pub struct Secrets {
    pub sectors_api_key: String,
    pub groq_api_key: String,
}

impl Secrets {
    /// Load both secrets from the environment, failing on the first one missing.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            sectors_api_key: require("SECTORS_API_KEY")?,
            groq_api_key: require("GROQ_API_KEY")?,
        })
    }
}

fn require(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AgentError::MissingSecret(format!(
            "{} is not set. Add it to your environment or .env file.",
            name
        ))),
    }
}
