//! SQL schema for the Depot SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS assets (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    device_type    TEXT NOT NULL DEFAULT '',
    make           TEXT NOT NULL DEFAULT '',
    model          TEXT NOT NULL DEFAULT '',
    serial_number  TEXT NOT NULL UNIQUE,
    stock_number   TEXT NOT NULL DEFAULT '',
    account_code   TEXT NOT NULL DEFAULT '',
    price          REAL,
    building       TEXT NOT NULL,
    room           TEXT NOT NULL,
    classification TEXT,
    rack           TEXT,
    row_num        TEXT,
    table_num      TEXT,
    assigned_to    TEXT NOT NULL DEFAULT 'Available',
    tags           TEXT NOT NULL DEFAULT '',  -- normalised comma-separated
    date_added     TEXT NOT NULL,             -- ISO 8601 UTC; server-assigned
    last_modified  TEXT NOT NULL,
    last_scanned   TEXT                       -- NULL until the first scan
);

-- Transactions are strictly append-only.
-- No UPDATE is ever issued against this table; rows leave only through the
-- asset-deletion cascade.
CREATE TABLE IF NOT EXISTS transactions (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    asset_id  INTEGER NOT NULL REFERENCES assets(id) ON DELETE CASCADE,
    user_name TEXT NOT NULL,
    assignee  TEXT,
    action    TEXT NOT NULL,  -- CREATE | CREATE_ASSIGN | CHECKOUT | CHECKIN
    timestamp TEXT NOT NULL   -- ISO 8601 UTC; server-assigned
);

CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,  -- argon2 PHC string, never plaintext
    role          TEXT NOT NULL DEFAULT 'User',
    scope         TEXT NOT NULL DEFAULT 'Read Only'
);

CREATE INDEX IF NOT EXISTS assets_serial_idx      ON assets(serial_number);
CREATE INDEX IF NOT EXISTS transactions_asset_idx ON transactions(asset_id);
CREATE INDEX IF NOT EXISTS transactions_time_idx  ON transactions(timestamp);

PRAGMA user_version = 1;
";
