//! SQL schema for the churn warehouse.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Staging relations hold the raw text of the source files. Insertion order
-- is the implicit rowid.
CREATE TABLE IF NOT EXISTS stg_customer_demographics (
    customerid    TEXT,
    gender        TEXT,
    seniorcitizen TEXT,
    partner       TEXT,
    dependents    TEXT
);

CREATE TABLE IF NOT EXISTS stg_customer_services (
    customerid       TEXT,
    phoneservice     TEXT,
    multiplelines    TEXT,
    internetservice  TEXT,
    onlinesecurity   TEXT,
    onlinebackup     TEXT,
    deviceprotection TEXT,
    techsupport      TEXT,
    streamingtv      TEXT,
    streamingmovies  TEXT,
    contract         TEXT,
    paperlessbilling TEXT,
    paymentmethod    TEXT,
    monthlycharges   TEXT,
    totalcharges     TEXT,
    tenure           TEXT,
    churn            TEXT
);

-- One row per natural key; upserted in place.
CREATE TABLE IF NOT EXISTS dim_customer (
    customer_pk       INTEGER PRIMARY KEY AUTOINCREMENT,
    customer_id       TEXT NOT NULL UNIQUE CHECK (length(trim(customer_id)) > 0),
    gender            TEXT CHECK (gender IN ('Male', 'Female')),
    is_senior_citizen INTEGER CHECK (is_senior_citizen IN (0, 1)),
    has_partner       INTEGER CHECK (has_partner IN (0, 1)),
    has_dependents    INTEGER CHECK (has_dependents IN (0, 1)),
    updated_at        TEXT NOT NULL   -- ISO 8601 UTC; refreshed on every upsert
);

-- Facts are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS fact_churn_events (
    fact_id               INTEGER PRIMARY KEY AUTOINCREMENT,
    customer_pk           INTEGER NOT NULL REFERENCES dim_customer(customer_pk),
    has_phone_service     INTEGER NOT NULL,
    has_multiple_lines    INTEGER NOT NULL,
    has_online_security   INTEGER NOT NULL,
    has_online_backup     INTEGER NOT NULL,
    has_device_protection INTEGER NOT NULL,
    has_tech_support      INTEGER NOT NULL,
    has_streaming_tv      INTEGER NOT NULL,
    has_streaming_movies  INTEGER NOT NULL,
    is_paperless_billing  INTEGER NOT NULL,
    internet_service      TEXT,
    contract_type         TEXT,
    payment_method        TEXT,
    monthly_charges       REAL NOT NULL,
    total_charges         REAL NOT NULL,
    tenure_months         INTEGER NOT NULL CHECK (tenure_months >= 0),
    churned               INTEGER NOT NULL,
    load_run_id           TEXT NOT NULL,
    loaded_at             TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS fact_churn_customer_idx ON fact_churn_events(customer_pk);
CREATE INDEX IF NOT EXISTS fact_churn_run_idx      ON fact_churn_events(load_run_id);

PRAGMA user_version = 1;
";
