use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "QuizGen";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default Gemini model used for quiz generation
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Google Generative Language REST endpoint
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default LLM request timeout. Generous: large quizzes take minutes.
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;

/// Timeout for fetching a web page to quiz from.
pub const URL_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Browser-like User-Agent; many sites refuse obvious bot agents.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

const ENV_API_KEY: &str = "GEMINI_API_KEY";
const ENV_MODEL: &str = "QUIZGEN_MODEL";
const ENV_API_BASE: &str = "QUIZGEN_API_BASE";
const ENV_LLM_TIMEOUT: &str = "QUIZGEN_LLM_TIMEOUT_SECS";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "quizgen_lib=info,quizgen=info,warn"
}

/// Runtime settings for the generation client.
///
/// Loading never fails: a missing API key is reported when a client is
/// constructed from these settings, not here.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub llm_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            llm_timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = Self::default();
        let llm_timeout_secs = match get(ENV_LLM_TIMEOUT) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    tracing::warn!(value = %raw, "Ignoring invalid {ENV_LLM_TIMEOUT}");
                    defaults.llm_timeout_secs
                }
            },
            None => defaults.llm_timeout_secs,
        };

        Self {
            api_key: get(ENV_API_KEY),
            model: get(ENV_MODEL).unwrap_or(defaults.model),
            api_base: get(ENV_API_BASE).unwrap_or(defaults.api_base),
            llm_timeout_secs,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
