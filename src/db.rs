//! Database module - PostgreSQL connection and migrations

use sqlx::{postgres::PgPoolOptions, PgPool};

/// Create database connection pool
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Multiple statements: goes through the simple query protocol
    sqlx::raw_sql(SCHEMA_SQL)
        .execute(pool)
        .await?;

    tracing::info!("Database schema applied successfully");
    Ok(())
}

/// Database schema SQL
const SCHEMA_SQL: &str = r#"
-- One row per orchestrated lookup
CREATE TABLE IF NOT EXISTS lookup_requests (
    id UUID PRIMARY KEY,
    indicator_type VARCHAR(16) NOT NULL,
    indicator_value TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Cached raw provider responses (successful calls only)
CREATE TABLE IF NOT EXISTS lookup_results (
    id BIGSERIAL PRIMARY KEY,
    request_id UUID NOT NULL REFERENCES lookup_requests(id) ON DELETE CASCADE,
    provider_code VARCHAR(64) NOT NULL,
    raw_response JSONB NOT NULL,
    cached_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    ttl_seconds INT NOT NULL,
    UNIQUE (request_id, provider_code)
);

-- Audit Log
CREATE TABLE IF NOT EXISTS audit_logs (
    id BIGSERIAL PRIMARY KEY,
    request_id UUID,
    action VARCHAR(100) NOT NULL,
    resource_type VARCHAR(50) NOT NULL,
    resource_id VARCHAR(64) NOT NULL,
    ip_hash VARCHAR(64),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_lookup_requests_indicator ON lookup_requests(indicator_type, indicator_value);
CREATE INDEX IF NOT EXISTS idx_lookup_requests_created ON lookup_requests(created_at);
CREATE INDEX IF NOT EXISTS idx_lookup_results_provider ON lookup_results(provider_code, cached_at);
CREATE INDEX IF NOT EXISTS idx_audit_logs_request ON audit_logs(request_id, created_at);
"#;
