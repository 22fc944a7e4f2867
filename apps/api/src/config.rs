use anyhow::{bail, Context, Result};

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if the completion service credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    /// Attempts per completion call. 1 means a single request with no retry.
    pub llm_max_attempts: u32,
    /// Sections evaluated at once. 1 keeps evaluation strictly sequential.
    pub section_concurrency: usize,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config = Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            llm_model: std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            llm_max_attempts: parse_env("LLM_MAX_ATTEMPTS", 1)?,
            section_concurrency: parse_env("SECTION_CONCURRENCY", 1)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.anthropic_api_key.trim().is_empty() {
            bail!("ANTHROPIC_API_KEY must not be empty");
        }
        if self.llm_max_attempts == 0 {
            bail!("LLM_MAX_ATTEMPTS must be at least 1");
        }
        if self.section_concurrency == 0 {
            bail!("SECTION_CONCURRENCY must be at least 1");
        }
        Ok(())
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            anthropic_api_key: "test-key".to_string(),
            llm_model: DEFAULT_MODEL.to_string(),
            llm_timeout_secs: 5,
            llm_max_attempts: 1,
            section_concurrency: 1,
            max_upload_bytes: 1024 * 1024,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_falls_back_to_default() {
        let value: u16 = parse_env("PROMPTCV_TEST_UNSET_VARIABLE", 8080).unwrap();
        assert_eq!(value, 8080);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("PROMPTCV_TEST_BAD_PORT", "eighty");
        let result: Result<u16> = parse_env("PROMPTCV_TEST_BAD_PORT", 8080);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let config = Config {
            section_concurrency: 0,
            ..Config::for_tests()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_key() {
        let config = Config {
            anthropic_api_key: "   ".to_string(),
            ..Config::for_tests()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(Config::for_tests().validate().is_ok());
    }
}
