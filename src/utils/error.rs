use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExternalUsersError {
    #[error("Session API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Session API returned HTTP {status}")]
    UnexpectedStatus { status: u16 },

    #[error("Identity database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

impl ExternalUsersError {
    /// 是否屬於設定檔問題（CLI 依此決定退出碼）
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigValidationError { .. }
                | Self::InvalidConfigValueError { .. }
                | Self::MissingConfigError { .. }
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ApiError(_) | Self::UnexpectedStatus { .. } => {
                "Check that the identity provider is reachable from this host"
            }
            Self::DatabaseError(_) => "Check [database].url and that the schema is readable",
            Self::IoError(_) => "Check the config file path and permissions",
            Self::SerializationError(_) => "The session API response format may have changed",
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the configuration file and try again",
        }
    }
}

pub type Result<T> = std::result::Result<T, ExternalUsersError>;
