//! Runtime configuration loaded from the environment.
//!
//! `.env` in the working directory is read first (if present), then every
//! setting falls back to a default when the variable is absent or unparseable.
//!
//! | Variable                 | Default                                      |
//! |--------------------------|----------------------------------------------|
//! | `DREAMTELLER_HOST`       | `0.0.0.0`                                    |
//! | `DREAMTELLER_PORT`       | `8001`                                       |
//! | `DREAMTELLER_LOG`        | `info`                                       |
//! | `DREAMTELLER_DATA_FILE`  | unset (in-memory store)                      |
//! | `LLM_API_KEY`            | unset, `EMERGENT_LLM_KEY` is also accepted   |
//! | `LLM_API_URL`            | `https://api.openai.com/v1/chat/completions` |
//! | `LLM_MODEL`              | `gpt-4o-mini`                                |
//! | `LLM_MAX_TOKENS`         | `900`                                        |
//! | `LLM_TEMPERATURE`        | `0.8`                                        |
//! | `LLM_TIMEOUT_SECS`       | `60`                                         |
//! | `LLM_MAX_RETRIES`        | `3`                                          |
//! | `CORS_ORIGINS`           | `*`                                          |
//! | `MEDIA_BASE_URL`         | `https://example.com`                        |
//! | `MAX_DREAM_CHARS`        | `5000`                                       |

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub generation: GenerationConfig,
    /// Tracing filter string, e.g. `"dreamteller=debug,info"`.
    pub log_level: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    /// Journal file for the persistent store. `None` keeps everything in memory.
    pub data_file: Option<PathBuf>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LlmConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_seconds: u64,
    pub max_retries: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GenerationConfig {
    pub media_base_url: String,
    pub max_dream_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            llm: LlmConfig::default(),
            generation: GenerationConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
            cors_origins: vec!["*".to_string()],
            data_file: None,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 900,
            temperature: 0.8,
            timeout_seconds: 60,
            max_retries: 3,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            media_base_url: "https://example.com".to_string(),
            max_dream_chars: 5000,
        }
    }
}

impl Config {
    /// Load `.env` (if any) and then read the process environment.
    pub fn load() -> Self {
        dotenv::dotenv().ok();
        Self::from_env()
    }

    /// Read configuration from environment variables only.
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Self {
            server: ServerConfig {
                host: env_str("DREAMTELLER_HOST", &defaults.server.host),
                port: env_parse("DREAMTELLER_PORT", defaults.server.port),
                cors_origins: parse_origins(&env_str("CORS_ORIGINS", "*")),
                data_file: env_opt("DREAMTELLER_DATA_FILE").map(PathBuf::from),
            },
            llm: LlmConfig {
                api_key: env_opt("LLM_API_KEY").or_else(|| env_opt("EMERGENT_LLM_KEY")),
                api_url: env_str("LLM_API_URL", &defaults.llm.api_url),
                model: env_str("LLM_MODEL", &defaults.llm.model),
                max_tokens: env_parse("LLM_MAX_TOKENS", defaults.llm.max_tokens),
                temperature: env_parse("LLM_TEMPERATURE", defaults.llm.temperature),
                timeout_seconds: env_parse("LLM_TIMEOUT_SECS", defaults.llm.timeout_seconds),
                max_retries: env_parse("LLM_MAX_RETRIES", defaults.llm.max_retries).max(1),
            },
            generation: GenerationConfig {
                media_base_url: env_str("MEDIA_BASE_URL", &defaults.generation.media_base_url),
                max_dream_chars: env_parse(
                    "MAX_DREAM_CHARS",
                    defaults.generation.max_dream_chars,
                ),
            },
            log_level: env_str("DREAMTELLER_LOG", &defaults.log_level),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect();
    if origins.is_empty() {
        vec!["*".to_string()]
    } else {
        origins
    }
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
