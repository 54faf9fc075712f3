//! SQL schema for the Meridian SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Timestamps are fixed-width RFC 3339 strings, so ordering by the column
/// orders by time. Ties fall back to `rowid`, i.e. insertion order.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS contacts (
    id              TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    email           TEXT NOT NULL,
    phone           TEXT,
    subject         TEXT NOT NULL,
    message         TEXT NOT NULL,
    preferred_date  TEXT,
    preferred_time  TEXT,
    status          TEXT NOT NULL DEFAULT 'new',   -- 'new' | 'contacted' | 'closed'
    created_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS newsletters (
    id              TEXT PRIMARY KEY,
    email           TEXT NOT NULL UNIQUE,
    subscribed_at   TEXT NOT NULL,
    is_active       INTEGER NOT NULL DEFAULT 1
);

-- user_id lives in the external identity provider's namespace; there is no
-- local users table to reference.
CREATE TABLE IF NOT EXISTS documents (
    id              TEXT PRIMARY KEY,
    user_id         TEXT NOT NULL,
    name            TEXT NOT NULL,
    type            TEXT NOT NULL,
    object_path     TEXT NOT NULL,
    status          TEXT NOT NULL DEFAULT 'pending', -- 'pending' | 'verified' | 'rejected'
    uploaded_at     TEXT NOT NULL,
    reviewed_at     TEXT,
    review_notes    TEXT
);

CREATE TABLE IF NOT EXISTS blog_posts (
    id              TEXT PRIMARY KEY,
    title           TEXT NOT NULL,
    slug            TEXT NOT NULL UNIQUE,
    excerpt         TEXT NOT NULL,
    content         TEXT NOT NULL,
    author          TEXT NOT NULL,
    category        TEXT NOT NULL,
    image_url       TEXT,
    is_published    INTEGER NOT NULL DEFAULT 0,
    published_at    TEXT,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS whitepapers (
    id              TEXT PRIMARY KEY,
    title           TEXT NOT NULL,
    description     TEXT NOT NULL,
    author          TEXT NOT NULL,
    file_url        TEXT NOT NULL,
    download_count  INTEGER NOT NULL DEFAULT 0 CHECK (download_count >= 0),
    is_published    INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS appointments (
    id              TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    email           TEXT NOT NULL,
    phone           TEXT,
    preferred_date  TEXT NOT NULL,
    preferred_time  TEXT NOT NULL,
    service_type    TEXT NOT NULL,
    message         TEXT,
    status          TEXT NOT NULL DEFAULT 'pending', -- 'pending' | 'confirmed' | 'cancelled'
    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS documents_owner_idx     ON documents(user_id, uploaded_at);
CREATE INDEX IF NOT EXISTS blog_posts_published_idx ON blog_posts(is_published, published_at);
CREATE INDEX IF NOT EXISTS whitepapers_created_idx ON whitepapers(created_at);

PRAGMA user_version = 1;
";
