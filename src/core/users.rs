use crate::adapters::{HttpSessionClient, MySqlEmailDirectory};
use crate::config::toml_config::ExternalUsersConfig;
use crate::core::html;
use crate::domain::model::{LoggedInUser, LoginLinks, RequestContext};
use crate::domain::ports::{EmailDirectory, ExternalUsers, SessionProvider};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Column type for user ids in the host's tables; usernames fit in 100 chars.
pub const USER_COLUMN_TYPE: &str = "VARCHAR(100)";

/// External user integration backed by an omegaUp-style identity provider.
pub struct OmegaUpUsers<S: SessionProvider, E: EmailDirectory> {
    config: ExternalUsersConfig,
    sessions: S,
    emails: E,
}

impl OmegaUpUsers<HttpSessionClient, MySqlEmailDirectory> {
    pub fn from_config(config: ExternalUsersConfig) -> Result<Self> {
        let sessions = HttpSessionClient::new(&config.session)?;
        let emails = MySqlEmailDirectory::connect_lazy(&config.database)?;
        Ok(Self::new(config, sessions, emails))
    }
}

impl<S: SessionProvider, E: EmailDirectory> OmegaUpUsers<S, E> {
    pub fn new(config: ExternalUsersConfig, sessions: S, emails: E) -> Self {
        if !config.has_privileged_users() {
            tracing::warn!(
                "[levels] grants no elevated privileges; every user will be treated as basic"
            );
        }
        Self {
            config,
            sessions,
            emails,
        }
    }

    pub fn config(&self) -> &ExternalUsersConfig {
        &self.config
    }

    /// 取得 session API 的根網址；未設定時沿用請求的主機但不帶埠號
    fn api_root(&self, ctx: &RequestContext) -> String {
        match &self.config.session.api_root {
            Some(root) => root.clone(),
            None => ctx.root_url(false),
        }
    }

    fn redirect_link(&self, root: &str, page: &str, redirect_back_to_url: &str) -> String {
        let target = format!("{}{}", self.config.site.site_path, redirect_back_to_url);
        format!(
            "{}{}?{}={}",
            root,
            page,
            self.config.site.redirect_param,
            urlencoding::encode(&target)
        )
    }
}

#[async_trait]
impl<S: SessionProvider, E: EmailDirectory> ExternalUsers for OmegaUpUsers<S, E> {
    fn user_column_type(&self) -> &'static str {
        USER_COLUMN_TYPE
    }

    fn login_links(
        &self,
        ctx: &RequestContext,
        _relative_url_prefix: &str,
        redirect_back_to_url: &str,
    ) -> LoginLinks {
        let root = ctx.root_url(true);
        let site = &self.config.site;

        LoginLinks {
            login: Some(self.redirect_link(&root, &site.login_page, redirect_back_to_url)),
            register: (!site.register_page.is_empty())
                .then(|| format!("{}{}", root, site.register_page)),
            logout: Some(self.redirect_link(&root, &site.logout_page, redirect_back_to_url)),
        }
    }

    async fn logged_in_user(&self, ctx: &RequestContext) -> Option<LoggedInUser> {
        let token = ctx.cookie(&self.config.session.cookie_name)?;
        let api_root = self.api_root(ctx);

        let session = match self.sessions.current_session(&api_root, token).await {
            Ok(Some(session)) => session,
            Ok(None) => {
                tracing::debug!("Session token rejected by identity provider");
                return None;
            }
            Err(e) => {
                tracing::warn!("Could not resolve current session: {}", e);
                return None;
            }
        };

        let level = self.config.level_for(&session.username);
        tracing::debug!("Resolved session for {} ({})", session.username, level);

        Some(LoggedInUser {
            userid: session.username.clone(),
            publicusername: session.username,
            email: session.email,
            level,
        })
    }

    async fn user_email(&self, userid: &str) -> Option<String> {
        match self.emails.email_for_user(userid).await {
            Ok(email) => email,
            Err(e) => {
                tracing::warn!("Email lookup failed for {}: {}", userid, e);
                None
            }
        }
    }

    fn userids_from_public(&self, publicusernames: &[String]) -> HashMap<String, String> {
        publicusernames
            .iter()
            .map(|name| (name.clone(), name.clone()))
            .collect()
    }

    fn public_from_userids(&self, userids: &[String]) -> HashMap<String, String> {
        userids
            .iter()
            .map(|userid| (userid.clone(), userid.clone()))
            .collect()
    }

    fn logged_in_user_html(&self, user: &LoggedInUser, relative_url_prefix: &str) -> String {
        html::user_link_html(
            relative_url_prefix,
            &user.publicusername,
            &html::escape_html(&user.publicusername),
        )
    }

    fn users_html(
        &self,
        userids: &[String],
        should_include_link: bool,
        relative_url_prefix: &str,
    ) -> HashMap<String, String> {
        let useridtopublic = self.public_from_userids(userids);

        useridtopublic
            .into_iter()
            .map(|(userid, publicusername)| {
                let name_html = html::escape_html(&publicusername);
                let user_html = if should_include_link {
                    html::user_link_html(relative_url_prefix, &publicusername, &name_html)
                } else {
                    name_html
                };
                (userid, user_html)
            })
            .collect()
    }

    /// Gravatar images are square, so `padding` needs no extra markup.
    async fn avatar_html_from_userid(
        &self,
        userid: &str,
        size: u32,
        _padding: bool,
    ) -> Option<String> {
        let email = self.user_email(userid).await?;
        if email.trim().is_empty() {
            return None;
        }

        let hash = html::gravatar_hash(&email);
        Some(html::gravatar_img_html(&self.config.avatar.base_url, &hash, size))
    }

    fn user_report_action(&self, userid: &str, action: &str) {
        tracing::debug!("User {} performed {}", userid, action);
    }
}
