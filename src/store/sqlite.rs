use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::Store;
use super::schema::{REBUILD_SEARCH_INDEX, SCHEMA};
use crate::error::{Error, Result};
use crate::types::*;

const SQLITE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    chrono::NaiveDateTime::parse_from_str(s, SQLITE_DATETIME_FORMAT)
        .map(|ndt| ndt.and_utc())
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc)))
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

/// SQLite's own `datetime('now')` layout, so `date(created_at)` works in SQL.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format(SQLITE_DATETIME_FORMAT).to_string()
}

/// Builds an FTS5 MATCH expression where every whitespace-separated term is
/// a quoted prefix query. Returns `None` when nothing searchable remains.
fn fts_match_expression(term: &str) -> Option<String> {
    let terms: Vec<String> = term
        .split_whitespace()
        .filter(|t| t.chars().any(char::is_alphanumeric))
        .map(|t| format!("\"{}\"*", t.replace('"', "\"\"")))
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" "))
    }
}

impl ToSql for Language {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Language {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        Language::parse(s).ok_or_else(|| FromSqlError::Other(format!("unknown language '{s}'").into()))
    }
}

impl ToSql for ContentKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ContentKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        ContentKind::parse(s)
            .ok_or_else(|| FromSqlError::Other(format!("unknown content type '{s}'").into()))
    }
}

/// Maps `id, language, type, image, title, body, meta_tag, created_at,
/// featured, score` in that order.
fn content_from_row(row: &Row<'_>) -> rusqlite::Result<Content> {
    Ok(Content {
        id: row.get(0)?,
        language: row.get(1)?,
        kind: row.get(2)?,
        image: row.get(3)?,
        title: row.get(4)?,
        body: row.get(5)?,
        tag: row.get(6)?,
        created_at: parse_datetime(&row.get::<_, String>(7)?),
        featured: row.get(8)?,
        score: row.get(9)?,
    })
}

fn admin_from_row(row: &Row<'_>) -> rusqlite::Result<AdminAccount> {
    Ok(AdminAccount {
        username: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        created_at: parse_datetime(&row.get::<_, String>(3)?),
    })
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(SCHEMA)?;
        conn.execute(REBUILD_SEARCH_INDEX, [])?;
        Ok(())
    }

    // Content operations

    fn create_content(&self, content: &NewContent) -> Result<Content> {
        let created_at = format_datetime(&content.created_at);
        let conn = self.conn();
        conn.execute(
            "INSERT INTO blog_data (language, type, image, title, body, meta_tag, created_at, featured)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                content.language,
                content.kind,
                content.image,
                content.title,
                content.body,
                content.tag,
                created_at,
                content.featured,
            ],
        )?;

        Ok(Content {
            id: conn.last_insert_rowid(),
            language: content.language,
            kind: content.kind,
            image: content.image.clone(),
            title: content.title.clone(),
            body: content.body.clone(),
            tag: content.tag.clone(),
            created_at: parse_datetime(&created_at),
            featured: content.featured,
            score: None,
        })
    }

    fn get_content(&self, id: i64) -> Result<Option<Content>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, language, type, image, title, body, meta_tag, created_at, featured, NULL
             FROM blog_data WHERE id = ?1",
            params![id],
            content_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn update_content(&self, content: &Content) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE blog_data
             SET language = ?1, type = ?2, image = ?3, title = ?4, body = ?5, meta_tag = ?6, featured = ?7
             WHERE id = ?8",
            params![
                content.language,
                content.kind,
                content.image,
                content.title,
                content.body,
                content.tag,
                content.featured,
                content.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_content(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM blog_data WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn list_contents(&self, query: &ContentQuery) -> Result<Vec<Content>> {
        let conn = self.conn();
        let kind = query.kind.map(ContentKind::as_str);
        let limit = ContentQuery::PAGE_SIZE;
        let offset = query.offset();

        let expression = match query.search.as_deref() {
            // A keyword with nothing searchable in it matches nothing.
            Some(term) => match fts_match_expression(term) {
                Some(expression) => Some(expression),
                None => return Ok(Vec::new()),
            },
            None => None,
        };

        let contents = match expression {
            Some(expression) => {
                let mut stmt = conn.prepare(
                    "SELECT d.id, d.language, d.type, d.image, d.title, d.body, d.meta_tag,
                            d.created_at, d.featured, bm25(blog_search) AS score
                     FROM blog_search
                     JOIN blog_data d ON d.id = blog_search.rowid
                     WHERE blog_search MATCH ?1
                       AND d.language = ?2
                       AND (?3 IS NULL OR d.type = ?3)
                       AND (?4 IS NULL OR d.featured = ?4)
                     ORDER BY score ASC
                     LIMIT ?5 OFFSET ?6",
                )?;
                let rows = stmt.query_map(
                    params![expression, query.language, kind, query.featured, limit, offset],
                    content_from_row,
                )?;
                rows.collect::<std::result::Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT id, language, type, image, title, body, meta_tag, created_at, featured, NULL
                     FROM blog_data
                     WHERE language = ?1
                       AND (?2 IS NULL OR type = ?2)
                       AND (?3 IS NULL OR featured = ?3)
                     ORDER BY created_at DESC, id DESC
                     LIMIT ?4 OFFSET ?5",
                )?;
                let rows = stmt.query_map(
                    params![query.language, kind, query.featured, limit, offset],
                    content_from_row,
                )?;
                rows.collect::<std::result::Result<Vec<_>, _>>()?
            }
        };

        Ok(contents)
    }

    // Admin operations

    fn create_admin(&self, admin: &AdminAccount) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO admins (username, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                admin.username,
                admin.email,
                admin.password_hash,
                format_datetime(&admin.created_at),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(Error::AlreadyExists)
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_admin_by_username(&self, username: &str) -> Result<Option<AdminAccount>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT username, email, password_hash, created_at FROM admins WHERE username = ?1",
            params![username],
            admin_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_admin_by_email(&self, email: &str) -> Result<Option<AdminAccount>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT username, email, password_hash, created_at FROM admins WHERE email = ?1",
            params![email],
            admin_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    // Contact request operations

    fn create_contact_request(&self, request: &NewContactRequest) -> Result<ContactRequest> {
        let created_at = format_datetime(&request.created_at);
        let conn = self.conn();
        conn.execute(
            "INSERT INTO contact_requests (name, lastname, phone, description, telegram, ip, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                request.name,
                request.lastname,
                request.phone,
                request.description,
                request.telegram,
                request.ip,
                created_at,
            ],
        )?;

        Ok(ContactRequest {
            id: conn.last_insert_rowid(),
            name: request.name.clone(),
            lastname: request.lastname.clone(),
            phone: request.phone.clone(),
            description: request.description.clone(),
            telegram: request.telegram.clone(),
            ip: request.ip.clone(),
            created_at: parse_datetime(&created_at),
        })
    }

    fn count_contact_requests_on(&self, ip: &str, day: NaiveDate) -> Result<i64> {
        let conn = self.conn();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM contact_requests WHERE ip = ?1 AND date(created_at) = ?2",
            params![ip, day.format("%Y-%m-%d").to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
