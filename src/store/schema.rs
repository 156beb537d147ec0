pub const SCHEMA: &str = r#"
-- Blog posts and project write-ups
CREATE TABLE IF NOT EXISTS blog_data (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    language TEXT NOT NULL,
    type TEXT NOT NULL,
    image TEXT NOT NULL DEFAULT '',
    title TEXT NOT NULL,
    body TEXT NOT NULL,
    meta_tag TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    featured INTEGER NOT NULL DEFAULT 0
);

-- External-content FTS index over blog_data; rowid = blog_data.id
CREATE VIRTUAL TABLE IF NOT EXISTS blog_search USING fts5(
    title,
    body,
    content='blog_data',
    content_rowid='id',
    tokenize='porter'
);

-- The triggers run inside the mutating statement, so a row and its
-- index entry are always written in the same transaction.
CREATE TRIGGER IF NOT EXISTS blog_data_ai AFTER INSERT ON blog_data BEGIN
    INSERT INTO blog_search(rowid, title, body) VALUES (new.id, new.title, new.body);
END;

CREATE TRIGGER IF NOT EXISTS blog_data_ad AFTER DELETE ON blog_data BEGIN
    INSERT INTO blog_search(blog_search, rowid, title, body)
    VALUES ('delete', old.id, old.title, old.body);
END;

CREATE TRIGGER IF NOT EXISTS blog_data_au AFTER UPDATE ON blog_data BEGIN
    INSERT INTO blog_search(blog_search, rowid, title, body)
    VALUES ('delete', old.id, old.title, old.body);
    INSERT INTO blog_search(rowid, title, body) VALUES (new.id, new.title, new.body);
END;

-- Admin accounts
CREATE TABLE IF NOT EXISTS admins (
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,   -- argon2id hash with embedded salt
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Visitor contact requests (append-only)
CREATE TABLE IF NOT EXISTS contact_requests (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    lastname TEXT NOT NULL,
    phone TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    telegram TEXT NOT NULL,
    ip TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_blog_data_listing ON blog_data(language, type, created_at);
CREATE INDEX IF NOT EXISTS idx_contact_requests_ip ON contact_requests(ip, created_at);
"#;

/// Repopulates the FTS index from blog_data. Picks up rows written before
/// the index existed.
pub const REBUILD_SEARCH_INDEX: &str = "INSERT INTO blog_search(blog_search) VALUES ('rebuild')";
