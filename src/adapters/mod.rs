// Adapters layer: concrete implementations of the domain ports (session API over http, email lookup over sql).

pub mod email_store;
pub mod session_client;

pub use email_store::MySqlEmailDirectory;
pub use session_client::HttpSessionClient;
