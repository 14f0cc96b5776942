use crate::domain::model::{LoggedInUser, LoginLinks, RequestContext, SessionInfo};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Resolves a session token against the identity provider.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// `Ok(None)` means the provider answered and the session is not valid.
    async fn current_session(&self, api_root: &str, auth_token: &str)
        -> Result<Option<SessionInfo>>;
}

#[async_trait]
pub trait EmailDirectory: Send + Sync {
    async fn email_for_user(&self, userid: &str) -> Result<Option<String>>;
}

/// The hooks a host application calls when user management is external.
///
/// Every lookup degrades to `None` on failure; nothing here returns an error.
#[async_trait]
pub trait ExternalUsers: Send + Sync {
    /// SQL column type the host must use for user ids.
    fn user_column_type(&self) -> &'static str;

    fn login_links(
        &self,
        ctx: &RequestContext,
        relative_url_prefix: &str,
        redirect_back_to_url: &str,
    ) -> LoginLinks;

    async fn logged_in_user(&self, ctx: &RequestContext) -> Option<LoggedInUser>;

    async fn user_email(&self, userid: &str) -> Option<String>;

    fn userids_from_public(&self, publicusernames: &[String]) -> HashMap<String, String>;

    fn public_from_userids(&self, userids: &[String]) -> HashMap<String, String>;

    fn logged_in_user_html(&self, user: &LoggedInUser, relative_url_prefix: &str) -> String;

    fn users_html(
        &self,
        userids: &[String],
        should_include_link: bool,
        relative_url_prefix: &str,
    ) -> HashMap<String, String>;

    async fn avatar_html_from_userid(&self, userid: &str, size: u32, padding: bool)
        -> Option<String>;

    fn user_report_action(&self, userid: &str, action: &str);
}
