pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{HttpSessionClient, MySqlEmailDirectory};
pub use config::ExternalUsersConfig;
pub use crate::core::{
    ExternalUsers, LoggedInUser, LoginLinks, OmegaUpUsers, RequestContext, UserLevel,
};
pub use utils::error::{ExternalUsersError, Result};
