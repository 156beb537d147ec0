mod server;

pub use server::{DEFAULT_CONTACT_DAILY_LIMIT, ServerConfig, database_path};
