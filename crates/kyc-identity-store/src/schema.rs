//! User store database schema.

/// SQL to create the users table. Idempotent; run at startup.
pub const CREATE_USERS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS users (
    id            UUID PRIMARY KEY,
    name          VARCHAR(255) NOT NULL,
    email         VARCHAR(320) NOT NULL,
    password_hash TEXT NOT NULL,
    kyc_status    VARCHAR(16) NOT NULL DEFAULT 'pending',
    created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT users_email_key UNIQUE (email),
    CONSTRAINT users_kyc_status_check
        CHECK (kyc_status IN ('pending', 'verified', 'rejected'))
);
";
