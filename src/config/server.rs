use std::net::SocketAddr;
use std::path::PathBuf;

use crate::media::DEFAULT_FOLDER;

/// Contact submissions allowed per IP per calendar day.
pub const DEFAULT_CONTACT_DAILY_LIMIT: u32 = 2;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database: PathBuf,
    /// HS256 signing secret for admin bearer tokens. Must not be empty.
    pub jwt_secret: String,
    pub telegram_bot_token: String,
    pub telegram_admin_chat_id: String,
    /// `cloudinary://<key>:<secret>@<cloud>`. Without it image uploads fail
    /// and stored image references are served unchanged.
    pub cloudinary_url: Option<String>,
    pub media_folder: String,
    /// Exposes `POST /signup`.
    pub signup_enabled: bool,
    pub contact_daily_limit: u32,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database: PathBuf::from("./data/portfolio.db"),
            jwt_secret: String::new(),
            telegram_bot_token: String::new(),
            telegram_admin_chat_id: String::new(),
            cloudinary_url: None,
            media_folder: DEFAULT_FOLDER.to_string(),
            signup_enabled: false,
            contact_daily_limit: DEFAULT_CONTACT_DAILY_LIMIT,
        }
    }
}

/// Turns a `DATABASE_URL` value into a SQLite file path. Accepts plain paths
/// as well as `sqlite://`, `sqlite:` and `file:` prefixed forms.
#[must_use]
pub fn database_path(url: &str) -> PathBuf {
    let url = url.trim();
    let path = ["sqlite://", "sqlite:", "file:"]
        .iter()
        .find_map(|prefix| url.strip_prefix(prefix))
        .unwrap_or(url);
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".into(),
            port: 3000,
            ..Default::default()
        };
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_database_path() {
        assert_eq!(database_path("./data/p.db"), PathBuf::from("./data/p.db"));
        assert_eq!(database_path("sqlite://./data/p.db"), PathBuf::from("./data/p.db"));
        assert_eq!(database_path("sqlite:/var/p.db"), PathBuf::from("/var/p.db"));
        assert_eq!(database_path("file:p.db"), PathBuf::from("p.db"));
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert!(!config.signup_enabled);
        assert_eq!(config.contact_daily_limit, 2);
        assert_eq!(config.media_folder, "portfolio_uploads");
    }
}
