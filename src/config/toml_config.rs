use crate::domain::model::UserLevel;
use crate::utils::error::{ExternalUsersError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalUsersConfig {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub session: SessionConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub avatar: AvatarConfig,
    /// 使用者名稱 -> 權限等級；不在名單內的使用者一律為 basic
    #[serde(default)]
    pub levels: HashMap<String, UserLevel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Q&A 站台在主站下的路徑，登入後導回時會加在 redirect 前面
    pub site_path: String,
    pub login_page: String,
    /// 空字串代表不顯示該連結
    pub register_page: String,
    pub logout_page: String,
    pub redirect_param: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_path: "/preguntas/".to_string(),
            login_page: "/login.php".to_string(),
            register_page: "/login.php".to_string(),
            logout_page: "/logout.php".to_string(),
            redirect_param: "redirect".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub token_field: String,
    pub endpoint_path: String,
    /// 固定的 API 根網址；未設定時由請求的 Host（去掉埠號）推導
    pub api_root: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "ouat".to_string(),
            token_field: "auth_token".to_string(),
            endpoint_path: "/api/session/currentSession/".to_string(),
            api_root: None,
            timeout_seconds: None,
        }
    }
}

impl SessionConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_schema")]
    pub schema: String,
    pub max_connections: Option<u32>,
}

fn default_schema() -> String {
    "omegaup".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    pub base_url: String,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.gravatar.com/avatar/".to_string(),
        }
    }
}

impl ExternalUsersConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ExternalUsersError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ExternalUsersError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OMEGAUP_DB_URL})，找不到的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| {
            ExternalUsersError::ConfigValidationError {
                field: "env_substitution".to_string(),
                message: e.to_string(),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 查詢使用者的權限等級（區分大小寫）
    pub fn level_for(&self, username: &str) -> UserLevel {
        self.levels.get(username).copied().unwrap_or_default()
    }

    /// 名單中是否有任何高於 basic 的使用者
    pub fn has_privileged_users(&self) -> bool {
        self.levels.values().any(|level| *level > UserLevel::Basic)
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("session.cookie_name", &self.session.cookie_name)?;
        validation::validate_non_empty_string("session.token_field", &self.session.token_field)?;
        validation::validate_absolute_path("session.endpoint_path", &self.session.endpoint_path)?;

        if let Some(api_root) = &self.session.api_root {
            validation::validate_url("session.api_root", api_root)?;
        }
        if let Some(timeout) = self.session.timeout_seconds {
            validation::validate_positive_number("session.timeout_seconds", timeout, 1)?;
        }

        validation::validate_absolute_path("site.site_path", &self.site.site_path)?;
        validation::validate_absolute_path("site.login_page", &self.site.login_page)?;
        validation::validate_absolute_path("site.logout_page", &self.site.logout_page)?;
        if !self.site.register_page.is_empty() {
            validation::validate_absolute_path("site.register_page", &self.site.register_page)?;
        }
        validation::validate_non_empty_string("site.redirect_param", &self.site.redirect_param)?;

        if self.database.url.contains("${") {
            return Err(ExternalUsersError::MissingConfigError {
                field: "database.url".to_string(),
            });
        }
        validation::validate_database_url("database.url", &self.database.url)?;
        validation::validate_sql_identifier("database.schema", &self.database.schema)?;
        if let Some(max) = self.database.max_connections {
            validation::validate_positive_number("database.max_connections", max as u64, 1)?;
        }

        validation::validate_url("avatar.base_url", &self.avatar.base_url)?;

        Ok(())
    }
}

impl Validate for ExternalUsersConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
