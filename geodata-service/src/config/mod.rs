use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_EPA_BASE_URL: &str = "https://aqs.epa.gov/data/api";

#[derive(Debug, Clone, Deserialize)]
pub struct GeodataConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub data: DataConfig,
    pub llm: LlmConfig,
    pub epa: EpaConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Directory holding `<city>_<layer>.geojson` files written by the ingest tool.
    pub processed_dir: PathBuf,
    /// Directory served under `/static`; an `index.html` here becomes the home page.
    pub static_dir: PathBuf,
    /// City used when a request omits `?city=`.
    pub default_city: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    OpenAi,
    Mock,
}

impl std::str::FromStr for LlmProvider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAi),
            "mock" => Ok(LlmProvider::Mock),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "unknown LLM_PROVIDER '{}' (expected openai or mock)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

/// EPA AQS `dailyData/byCounty` request defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct EpaConfig {
    pub email: Option<String>,
    pub key: Option<String>,
    pub base_url: String,
    /// Parameter code: 88101 is PM2.5 FRM/FEM mass, 44201 is ozone.
    pub param: String,
    pub bdate: String,
    pub edate: String,
    /// State FIPS code (17 = Illinois).
    pub state: String,
    /// County FIPS code (031 = Cook County).
    pub county: String,
}

impl EpaConfig {
    /// Email and key, when both are set.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.email.as_deref(), self.key.as_deref()) {
            (Some(email), Some(key)) if !email.is_empty() && !key.is_empty() => Some((email, key)),
            _ => None,
        }
    }
}

impl GeodataConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let provider: LlmProvider = get_env("LLM_PROVIDER", Some("openai"), is_prod)?.parse()?;
        let api_key = match provider {
            LlmProvider::OpenAi => Some(get_env("OPENAI_API_KEY", None, is_prod)?),
            LlmProvider::Mock => get_optional_env("OPENAI_API_KEY"),
        };

        Ok(GeodataConfig {
            common: common_config,
            log_level: get_env("LOG_LEVEL", Some("info"), false)?,
            otlp_endpoint: get_optional_env("OTLP_ENDPOINT"),
            data: DataConfig {
                processed_dir: get_env("PROCESSED_DIR", Some("datasets/processed"), is_prod)?
                    .into(),
                static_dir: get_env("STATIC_DIR", Some("static"), false)?.into(),
                default_city: get_env("DEFAULT_CITY", Some("chicago"), false)?.to_lowercase(),
            },
            llm: LlmConfig {
                provider,
                api_key,
                model: get_env("OPENAI_MODEL", Some("gpt-5"), false)?,
                base_url: get_env("OPENAI_BASE_URL", Some(DEFAULT_OPENAI_BASE_URL), false)?,
            },
            epa: EpaConfig {
                email: get_optional_env("EPA_API_EMAIL"),
                key: get_optional_env("EPA_API_KEY"),
                base_url: get_env("EPA_BASE_URL", Some(DEFAULT_EPA_BASE_URL), false)?,
                param: get_env("EPA_PARAM", Some("88101"), false)?,
                bdate: get_env("EPA_BDATE", Some("20160101"), false)?,
                edate: get_env("EPA_EDATE", Some("20160229"), false)?,
                state: get_env("EPA_STATE", Some("17"), false)?,
                county: get_env("EPA_COUNTY", Some("031"), false)?,
            },
        })
    }
}

fn get_optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
