/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: comma-separated allowed origins (default: *)
/// - `ASSISTANT_API_KEY`: bearer key for the completion API (chat disabled when unset)
/// - `ASSISTANT_API_URL`: completion endpoint (default: DeepSeek chat completions)
/// - `ASSISTANT_MODEL`: completion model name (default: deepseek-chat)
/// - `RUST_LOG`: Log level (default: info)

use serde::{Deserialize, Serialize};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Assistant (chat completion) configuration
    pub assistant: AssistantConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; "*" means permissive
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Assistant configuration
///
/// The chat endpoint forwards user text to an external chat-completion API.
/// Without an API key the endpoint reports the assistant as unavailable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Bearer key for the completion API
    pub api_key: Option<String>,

    /// Completion endpoint URL
    pub api_url: String,

    /// Model name sent with every request
    pub model: String,
}

/// Default completion endpoint
const DEFAULT_ASSISTANT_URL: &str = "https://api.deepseek.com/v1/chat/completions";

/// Default completion model
const DEFAULT_ASSISTANT_MODEL: &str = "deepseek-chat";

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or
    /// have invalid values.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let assistant_api_key = env::var("ASSISTANT_API_KEY").ok().filter(|k| !k.is_empty());
        let assistant_api_url =
            env::var("ASSISTANT_API_URL").unwrap_or_else(|_| DEFAULT_ASSISTANT_URL.to_string());
        let assistant_model =
            env::var("ASSISTANT_MODEL").unwrap_or_else(|_| DEFAULT_ASSISTANT_MODEL.to_string());

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            assistant: AssistantConfig {
                api_key: assistant_api_key,
                api_url: assistant_api_url,
                model: assistant_model,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}
