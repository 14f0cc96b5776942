use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Privilege level understood by the host application.
///
/// Variants are declared in ascending order so that `Ord` follows privilege.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum UserLevel {
    #[default]
    Basic,
    Editor,
    Moderator,
    Admin,
    Super,
}

impl UserLevel {
    /// Numeric value stored by the host in its own tables.
    pub fn as_i32(self) -> i32 {
        match self {
            UserLevel::Basic => 0,
            UserLevel::Editor => 50,
            UserLevel::Moderator => 80,
            UserLevel::Admin => 100,
            UserLevel::Super => 120,
        }
    }

    pub fn can_access_admin(self) -> bool {
        self >= UserLevel::Admin
    }
}

impl fmt::Display for UserLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UserLevel::Basic => "basic",
            UserLevel::Editor => "editor",
            UserLevel::Moderator => "moderator",
            UserLevel::Admin => "admin",
            UserLevel::Super => "super",
        };
        f.write_str(name)
    }
}

impl FromStr for UserLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(UserLevel::Basic),
            "editor" => Ok(UserLevel::Editor),
            "moderator" => Ok(UserLevel::Moderator),
            "admin" => Ok(UserLevel::Admin),
            "super" => Ok(UserLevel::Super),
            other => Err(format!("unknown user level: {}", other)),
        }
    }
}

impl TryFrom<String> for UserLevel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A resolved, valid session as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub username: String,
    pub email: Option<String>,
}

/// The logged-in user handed back to the host. Rebuilt on every check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggedInUser {
    pub userid: String,
    pub publicusername: String,
    pub email: Option<String>,
    pub level: UserLevel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoginLinks {
    pub login: Option<String>,
    pub register: Option<String>,
    pub logout: Option<String>,
}

/// What the host knows about the request being served.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub https: bool,
    pub host: String,
    cookies: HashMap<String, String>,
}

impl RequestContext {
    pub fn new(host: impl Into<String>, https: bool) -> Self {
        Self {
            https,
            host: host.into(),
            cookies: HashMap::new(),
        }
    }

    /// 解析 `Cookie` 標頭，例如 `ouat=abc; lang=es`
    ///
    /// Browsers send the most specific cookie first, so only the first
    /// occurrence of a name is kept. Values are percent-decoded; a value
    /// that does not decode to UTF-8 is kept as sent.
    pub fn with_cookie_header(mut self, header: &str) -> Self {
        for pair in header.split(';') {
            if let Some((name, value)) = pair.split_once('=') {
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                let raw = value.trim().trim_matches('"');
                let value = urlencoding::decode(raw)
                    .map(|decoded| decoded.into_owned())
                    .unwrap_or_else(|_| raw.to_string());
                self.cookies.entry(name.to_string()).or_insert(value);
            }
        }
        self
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Scheme plus host. The port is dropped unless `include_port` is set.
    pub fn root_url(&self, include_port: bool) -> String {
        let scheme = if self.https { "https://" } else { "http://" };
        let host = if include_port {
            self.host.as_str()
        } else {
            strip_port(&self.host)
        };
        format!("{}{}", scheme, host)
    }
}

fn strip_port(host: &str) -> &str {
    // IPv6 字面值 [::1]:8080 的冒號不是埠號分隔符
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    host.split(':').next().unwrap_or(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_level_ordering_and_values() {
        assert!(UserLevel::Super > UserLevel::Admin);
        assert!(UserLevel::Admin > UserLevel::Moderator);
        assert!(UserLevel::Moderator > UserLevel::Editor);
        assert!(UserLevel::Editor > UserLevel::Basic);

        assert_eq!(UserLevel::Basic.as_i32(), 0);
        assert_eq!(UserLevel::Moderator.as_i32(), 80);
        assert_eq!(UserLevel::Super.as_i32(), 120);

        assert!(UserLevel::Admin.can_access_admin());
        assert!(UserLevel::Super.can_access_admin());
        assert!(!UserLevel::Moderator.can_access_admin());
    }

    #[test]
    fn test_user_level_parsing() {
        assert_eq!("SUPER".parse::<UserLevel>().unwrap(), UserLevel::Super);
        assert_eq!(" moderator ".parse::<UserLevel>().unwrap(), UserLevel::Moderator);
        assert!("root".parse::<UserLevel>().is_err());
        assert_eq!(UserLevel::Editor.to_string(), "editor");

        let from_json: UserLevel = serde_json::from_str("\"Admin\"").unwrap();
        assert_eq!(from_json, UserLevel::Admin);
        assert!(serde_json::from_str::<UserLevel>("\"root\"").is_err());
        assert_eq!(serde_json::to_string(&UserLevel::Super).unwrap(), "\"super\"");
    }

    #[test]
    fn test_cookie_header_parsing() {
        let ctx = RequestContext::new("omegaup.com", true)
            .with_cookie_header("lang=es; ouat=abc123 ; quoted=\"v\"; broken");

        assert_eq!(ctx.cookie("ouat"), Some("abc123"));
        assert_eq!(ctx.cookie("lang"), Some("es"));
        assert_eq!(ctx.cookie("quoted"), Some("v"));
        assert_eq!(ctx.cookie("broken"), None);
        assert_eq!(ctx.cookie("missing"), None);
    }

    #[test]
    fn test_cookie_header_keeps_first_duplicate() {
        let ctx = RequestContext::new("omegaup.com", true)
            .with_cookie_header("ouat=first; lang=es; ouat=second");

        assert_eq!(ctx.cookie("ouat"), Some("first"));
    }

    #[test]
    fn test_cookie_header_percent_decodes_values() {
        let ctx = RequestContext::new("omegaup.com", true)
            .with_cookie_header("ouat=a%2Bb%3Dc; raw=plain; bad=%FF%FE");

        assert_eq!(ctx.cookie("ouat"), Some("a+b=c"));
        assert_eq!(ctx.cookie("raw"), Some("plain"));
        // 無法解碼成 UTF-8 時保留原始值
        assert_eq!(ctx.cookie("bad"), Some("%FF%FE"));
    }

    #[test]
    fn test_root_url() {
        let ctx = RequestContext::new("omegaup.com:8080", false);
        assert_eq!(ctx.root_url(true), "http://omegaup.com:8080");
        assert_eq!(ctx.root_url(false), "http://omegaup.com");

        let secure = RequestContext::new("omegaup.com", true);
        assert_eq!(secure.root_url(true), "https://omegaup.com");
        assert_eq!(secure.root_url(false), "https://omegaup.com");

        let ipv6 = RequestContext::new("[::1]:8001", false);
        assert_eq!(ipv6.root_url(false), "http://[::1]");
        assert_eq!(ipv6.root_url(true), "http://[::1]:8001");
    }
}
