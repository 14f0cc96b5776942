pub mod html;
pub mod users;

pub use crate::domain::model::{LoggedInUser, LoginLinks, RequestContext, SessionInfo, UserLevel};
pub use crate::domain::ports::{EmailDirectory, ExternalUsers, SessionProvider};
pub use crate::utils::error::Result;
pub use users::OmegaUpUsers;
