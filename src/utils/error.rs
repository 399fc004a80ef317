use thiserror::Error;

#[derive(Error, Debug)]
pub enum HydrateError {
    #[error("`{field}` value: `{value}` has default value `{default}`.")]
    TypeMismatch {
        field: String,
        value: String,
        default: String,
    },

    #[error("Cannot coerce {value} to {target}")]
    Coercion { value: String, target: String },

    #[error("Record must be an object, found {found}")]
    InvalidRecord { found: String },

    #[error("Invalid collection: {message}")]
    InvalidCollection { message: String },

    #[error("Invalid entity field `{field}`: {message}")]
    InvalidEntity { field: String, message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API responded with status {status}: {details}")]
    ApiResponse { status: u16, details: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in `{field}`: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value `{value}` for `{field}`: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Template not found: {name}")]
    TemplateNotFound { name: String },
}

pub type Result<T> = std::result::Result<T, HydrateError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Data,
    Network,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl HydrateError {
    /// Errors scoped to a single record. Collection hydration may skip these.
    pub fn is_record_error(&self) -> bool {
        matches!(
            self,
            HydrateError::TypeMismatch { .. }
                | HydrateError::Coercion { .. }
                | HydrateError::InvalidRecord { .. }
                | HydrateError::InvalidEntity { .. }
        )
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            HydrateError::TypeMismatch { .. }
            | HydrateError::Coercion { .. }
            | HydrateError::InvalidRecord { .. }
            | HydrateError::InvalidCollection { .. }
            | HydrateError::InvalidEntity { .. }
            | HydrateError::SerializationError(_)
            | HydrateError::CsvError(_) => ErrorCategory::Data,
            HydrateError::ApiError(_) | HydrateError::ApiResponse { .. } => {
                ErrorCategory::Network
            }
            HydrateError::ConfigError { .. }
            | HydrateError::ConfigValidationError { .. }
            | HydrateError::MissingConfigError { .. }
            | HydrateError::InvalidConfigValueError { .. }
            | HydrateError::TemplateNotFound { .. } => ErrorCategory::Configuration,
            HydrateError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            HydrateError::TypeMismatch { .. } | HydrateError::Coercion { .. } => {
                "Check that the input field types match the template defaults, or pass --ignore-errors to skip bad records"
            }
            HydrateError::InvalidRecord { .. } | HydrateError::InvalidCollection { .. } => {
                "Input must be a JSON object, an array of objects, or an object with a `data` array"
            }
            HydrateError::InvalidEntity { .. } => {
                "The template does not match the entity type; check field names and defaults"
            }
            HydrateError::ApiError(_) => "Check network connectivity and the API URL",
            HydrateError::ApiResponse { .. } => "Check the API key and request parameters",
            HydrateError::SerializationError(_) | HydrateError::CsvError(_) => {
                "Make sure the input file contains valid JSON"
            }
            HydrateError::IoError(_) => "Check that the file exists and is readable",
            HydrateError::ConfigError { .. }
            | HydrateError::ConfigValidationError { .. }
            | HydrateError::MissingConfigError { .. }
            | HydrateError::InvalidConfigValueError { .. } => {
                "Review the configuration file and environment variables"
            }
            HydrateError::TemplateNotFound { .. } => {
                "Declare the template under [templates.<name>] in the configuration file"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Data => format!("Invalid data: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Network => match self {
                HydrateError::ApiResponse { details, .. } => details.clone(),
                _ => "Unknown error.".to_string(),
            },
            ErrorCategory::System => "Unknown error.".to_string(),
        }
    }
}
