use crate::core::coercion::parse_date;
use crate::core::collection::HydrateOptions;
use crate::domain::model::{FieldValue, Template};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{HydrateError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_url, Validate,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Environment variable overriding `api.url`.
pub const ENV_API_URL: &str = "JSON_HYDRATE_API_URL";
/// Environment variable overriding `api.api_key`.
pub const ENV_API_KEY: &str = "JSON_HYDRATE_API_KEY";

pub const DEFAULT_API_URL: &str = "https://www.omdbapi.com";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub hydration: HydrateOptions,
    #[serde(default)]
    pub templates: BTreeMap<String, TemplateConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    /// Environment variable holding the auth token sent with each request.
    pub token_env: Option<String>,
    pub timeout_seconds: Option<u64>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            api_key: String::new(),
            token_env: None,
            timeout_seconds: None,
        }
    }
}

/// A template declared in configuration. `fields` maps each field name to its
/// default; `passthrough` lists fields with no default type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateConfig {
    #[serde(default)]
    pub fields: toml::Table,
    #[serde(default)]
    pub passthrough: Vec<String>,
}

impl TemplateConfig {
    pub fn to_template(&self) -> Result<Template> {
        let mut template = Template::new();
        for (name, value) in &self.fields {
            template.insert(name.as_str(), default_from_toml(name, value)?);
        }
        for name in &self.passthrough {
            template.insert(name.as_str(), FieldValue::Undefined);
        }
        Ok(template)
    }
}

fn default_from_toml(field: &str, value: &toml::Value) -> Result<FieldValue> {
    Ok(match value {
        toml::Value::String(s) => FieldValue::String(s.clone()),
        toml::Value::Integer(i) => FieldValue::Number(*i as f64),
        toml::Value::Float(f) => FieldValue::Number(*f),
        toml::Value::Boolean(b) => FieldValue::Boolean(*b),
        toml::Value::Datetime(dt) => {
            let text = dt.to_string();
            let parsed = parse_date(&text).ok_or_else(|| HydrateError::InvalidConfigValueError {
                field: format!("templates.fields.{}", field),
                value: text.clone(),
                reason: "Date defaults need at least a calendar date".to_string(),
            })?;
            FieldValue::Date(Some(parsed))
        }
        toml::Value::Array(_) | toml::Value::Table(_) => {
            FieldValue::from(serde_json::to_value(value)?)
        }
    })
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(HydrateError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| HydrateError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_KEY})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(ENV_API_URL) {
            tracing::debug!("API URL overridden by {}", ENV_API_URL);
            self.api.url = url;
        }
        if let Ok(key) = std::env::var(ENV_API_KEY) {
            tracing::debug!("API key overridden by {}", ENV_API_KEY);
            self.api.api_key = key;
        }
    }

    pub fn template(&self, name: &str) -> Result<Template> {
        self.templates
            .get(name)
            .ok_or_else(|| HydrateError::TemplateNotFound {
                name: name.to_string(),
            })?
            .to_template()
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.api.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_url("api.url", &self.api.url)?;

        if let Some(timeout) = self.api.timeout_seconds {
            validate_positive_number("api.timeout_seconds", timeout as usize, 1)?;
        }

        if let Some(var) = &self.api.token_env {
            validate_non_empty_string("api.token_env", var)?;
        }

        for (name, template) in &self.templates {
            validate_non_empty_string("templates", name)?;
            if template.fields.is_empty() && template.passthrough.is_empty() {
                return Err(HydrateError::InvalidConfigValueError {
                    field: format!("templates.{}", name),
                    value: String::new(),
                    reason: "Template must declare at least one field".to_string(),
                });
            }
            template.to_template()?;
        }

        Ok(())
    }
}

impl ConfigProvider for AppConfig {
    fn api_url(&self) -> &str {
        &self.api.url
    }

    fn api_key(&self) -> &str {
        &self.api.api_key
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
