mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::types::*;

/// Store defines the database interface.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // Content operations
    fn create_content(&self, content: &NewContent) -> Result<Content>;
    fn get_content(&self, id: i64) -> Result<Option<Content>>;
    fn update_content(&self, content: &Content) -> Result<()>;
    fn delete_content(&self, id: i64) -> Result<bool>;
    fn list_contents(&self, query: &ContentQuery) -> Result<Vec<Content>>;

    /// Like `list_contents`, but an empty page is `Error::NoContents` so
    /// callers can tell "nothing matched" apart from a failed query.
    fn get_contents(&self, query: &ContentQuery) -> Result<Vec<Content>> {
        let contents = self.list_contents(query)?;
        if contents.is_empty() {
            return Err(Error::NoContents);
        }
        Ok(contents)
    }

    // Admin operations
    fn create_admin(&self, admin: &AdminAccount) -> Result<()>;
    fn get_admin_by_username(&self, username: &str) -> Result<Option<AdminAccount>>;
    fn get_admin_by_email(&self, email: &str) -> Result<Option<AdminAccount>>;

    // Contact request operations
    fn create_contact_request(&self, request: &NewContactRequest) -> Result<ContactRequest>;
    fn count_contact_requests_on(&self, ip: &str, day: NaiveDate) -> Result<i64>;
}
