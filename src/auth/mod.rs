mod helpers;
mod identity;
mod middleware;
mod password;
mod token;

pub use helpers::extract_token_from_header;
pub use identity::{authenticate, register_admin};
pub use middleware::{AuthError, RequireAdmin};
pub use password::PasswordHasher;
pub use token::{Claims, TOKEN_TTL_SECS, TokenSigner};
