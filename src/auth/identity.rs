use chrono::Utc;

use super::PasswordHasher;
use crate::error::{Error, Result};
use crate::server::validation::validate_email;
use crate::store::Store;
use crate::types::AdminAccount;

/// Creates an admin account. Fails with `BadRequest` on missing fields or a
/// malformed email and with `AlreadyExists` when the username or email is
/// taken.
pub fn register_admin(
    store: &dyn Store,
    hasher: &PasswordHasher,
    username: &str,
    email: &str,
    password: &str,
) -> Result<AdminAccount> {
    let username = username.trim();
    let email = email.trim();

    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(Error::BadRequest(
            "The sign up must contain username, email, password".into(),
        ));
    }
    if username.contains('@') {
        return Err(Error::BadRequest("Username cannot contain '@'".into()));
    }
    validate_email(email).map_err(Error::BadRequest)?;

    let admin = AdminAccount {
        username: username.to_string(),
        email: email.to_string(),
        password_hash: hasher.hash(password)?,
        created_at: Utc::now(),
    };
    store.create_admin(&admin)?;

    tracing::info!("Registered admin '{}'", admin.username);
    Ok(admin)
}

/// Checks a login attempt. The identifier is an email when it contains `@`,
/// a username otherwise. Unknown accounts and wrong passwords are both
/// `InvalidCredentials`.
pub fn authenticate(
    store: &dyn Store,
    hasher: &PasswordHasher,
    login: &str,
    password: &str,
) -> Result<AdminAccount> {
    let login = login.trim();

    let found = if login.contains('@') {
        store.get_admin_by_email(login)?
    } else {
        store.get_admin_by_username(login)?
    };
    let admin = found.ok_or(Error::InvalidCredentials)?;

    if !hasher.verify(password, &admin.password_hash)? {
        return Err(Error::InvalidCredentials);
    }

    Ok(admin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;
    use tempfile::TempDir;

    fn open_store() -> (TempDir, SqliteStore) {
        let temp = TempDir::new().unwrap();
        let store = SqliteStore::new(temp.path().join("test.db")).unwrap();
        store.initialize().unwrap();
        (temp, store)
    }

    #[test]
    fn test_register_then_authenticate_by_username_and_email() {
        let (_temp, store) = open_store();
        let hasher = PasswordHasher::new();

        register_admin(&store, &hasher, "shokh", "shokh@example.com", "s3cret").unwrap();

        let by_name = authenticate(&store, &hasher, "shokh", "s3cret").unwrap();
        assert_eq!(by_name.email, "shokh@example.com");

        let by_email = authenticate(&store, &hasher, "shokh@example.com", "s3cret").unwrap();
        assert_eq!(by_email.username, "shokh");
    }

    #[test]
    fn test_wrong_password_and_unknown_user() {
        let (_temp, store) = open_store();
        let hasher = PasswordHasher::new();
        register_admin(&store, &hasher, "shokh", "shokh@example.com", "s3cret").unwrap();

        assert!(matches!(
            authenticate(&store, &hasher, "shokh", "nope"),
            Err(Error::InvalidCredentials)
        ));
        assert!(matches!(
            authenticate(&store, &hasher, "nobody", "s3cret"),
            Err(Error::InvalidCredentials)
        ));
    }

    #[test]
    fn test_register_validation() {
        let (_temp, store) = open_store();
        let hasher = PasswordHasher::new();

        assert!(matches!(
            register_admin(&store, &hasher, "", "a@example.com", "pw"),
            Err(Error::BadRequest(_))
        ));
        assert!(matches!(
            register_admin(&store, &hasher, "admin", "not-an-email", "pw"),
            Err(Error::BadRequest(_))
        ));
        assert!(matches!(
            register_admin(&store, &hasher, "a@b", "a@example.com", "pw"),
            Err(Error::BadRequest(_))
        ));
    }

    #[test]
    fn test_register_duplicate() {
        let (_temp, store) = open_store();
        let hasher = PasswordHasher::new();
        register_admin(&store, &hasher, "shokh", "shokh@example.com", "pw").unwrap();

        assert!(matches!(
            register_admin(&store, &hasher, "shokh", "other@example.com", "pw"),
            Err(Error::AlreadyExists)
        ));
    }
}
