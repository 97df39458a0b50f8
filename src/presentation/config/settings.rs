use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub llm: LlmSettings,
    pub extraction: ExtractionSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    /// When unset the service falls back to the in-memory repository.
    pub url: Option<String>,
    pub max_connections: u32,
    /// Connection attempts beyond the first before giving up.
    pub connect_retries: u32,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    /// Emit line-delimited JSON instead of the human-readable format.
    pub json: bool,
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: usize,
    pub temperature: f32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ExtractionSettings {
    /// Ceiling on extracted text length in characters. Documents above it
    /// fail with `document_too_large` rather than being truncated.
    pub max_text_chars: usize,
    /// Capacity of the job queue between upload intake and the worker.
    pub queue_capacity: usize,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            server: ServerSettings {
                host: env_or("SERVER_HOST", "0.0.0.0"),
                port: env_parsed("SERVER_PORT", 3000),
            },
            database: DatabaseSettings {
                url: env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
                max_connections: env_parsed("DATABASE_MAX_CONNECTIONS", 5),
                connect_retries: env_parsed("DATABASE_CONNECT_RETRIES", 5),
            },
            llm: LlmSettings {
                base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
                api_key: env_or("OPENAI_API_KEY", ""),
                model: env_or("LLM_MODEL", "gpt-4o-mini"),
                max_tokens: env_parsed("LLM_MAX_TOKENS", 4000),
                temperature: env_parsed("LLM_TEMPERATURE", 0.0),
                timeout_secs: env_parsed("LLM_TIMEOUT_SECS", 60),
            },
            extraction: ExtractionSettings {
                max_text_chars: env_parsed("EXTRACTION_MAX_TEXT_CHARS", 200_000),
                queue_capacity: env_parsed("EXTRACTION_QUEUE_CAPACITY", 64),
            },
            logging: LoggingSettings {
                json: env::var("LOG_FORMAT")
                    .map(|v| v.eq_ignore_ascii_case("json"))
                    .unwrap_or(false),
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
