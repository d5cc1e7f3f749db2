use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, PgPool};
use sqlx::Row;
use uuid::Uuid;

mod store;

pub use store::PgSequenceStore;

pub const ENV_DB_URL: &str = "PGA_DATABASE_URL";

/// Connect to Postgres using PGA_DATABASE_URL.
pub async fn connect_from_env() -> Result<PgPool> {
    let url = std::env::var(ENV_DB_URL)
        .with_context(|| format!("missing env var {ENV_DB_URL}"))?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&url)
        .await
        .context("failed to connect to Postgres")?;

    Ok(pool)
}

/// Run embedded SQLx migrations.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("db migrate failed")?;
    Ok(())
}

/// Simple status query (connectivity + schema presence).
pub async fn status(pool: &PgPool) -> Result<DbStatus> {
    let (one,): (i32,) = sqlx::query_as::<_, (i32,)>("select 1")
        .fetch_one(pool)
        .await
        .context("status connectivity query failed")?;
    let ok = one == 1;

    let (exists,): (bool,) = sqlx::query_as::<_, (bool,)>(
        r#"
        select exists (
            select 1
            from information_schema.tables
            where table_schema='public' and table_name='counters'
        )
        "#,
    )
    .fetch_one(pool)
    .await
    .context("status table-exists query failed")?;

    Ok(DbStatus { ok, has_counters_table: exists })
}

#[derive(Debug, Clone)]
pub struct DbStatus {
    pub ok: bool,
    pub has_counters_table: bool,
}

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CounterRow {
    pub sequence_name: String,
    pub value: i64,
    pub updated_at_utc: DateTime<Utc>,
}

pub async fn fetch_counter(pool: &PgPool, sequence_name: &str) -> Result<Option<CounterRow>> {
    let row = sqlx::query(
        r#"
        select sequence_name, value, updated_at_utc
        from counters
        where sequence_name = $1
        "#,
    )
    .bind(sequence_name)
    .fetch_optional(pool)
    .await
    .context("fetch_counter failed")?;

    match row {
        None => Ok(None),
        Some(row) => Ok(Some(CounterRow {
            sequence_name: row.try_get("sequence_name")?,
            value: row.try_get("value")?,
            updated_at_utc: row.try_get("updated_at_utc")?,
        })),
    }
}

/// Idempotent upsert: create the counter at `value` or overwrite it
/// unconditionally.
pub async fn put_counter(pool: &PgPool, sequence_name: &str, value: i64) -> Result<()> {
    sqlx::query(
        r#"
        insert into counters (sequence_name, value, updated_at_utc)
        values ($1, $2, now())
        on conflict (sequence_name)
        do update set value = excluded.value, updated_at_utc = now()
        "#,
    )
    .bind(sequence_name)
    .bind(value)
    .execute(pool)
    .await
    .context("put_counter failed")?;
    Ok(())
}

/// Atomically increment the counter (creating it at 1 when absent) and
/// return the new value. Single statement, so concurrent mints never hand
/// out the same value.
pub async fn bump_counter(pool: &PgPool, sequence_name: &str) -> Result<i64> {
    let (value,): (i64,) = sqlx::query_as::<_, (i64,)>(
        r#"
        insert into counters (sequence_name, value, updated_at_utc)
        values ($1, 1, now())
        on conflict (sequence_name)
        do update set value = counters.value + 1, updated_at_utc = now()
        returning value
        "#,
    )
    .bind(sequence_name)
    .fetch_one(pool)
    .await
    .context("bump_counter failed")?;

    Ok(value)
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// Identifier of the most-recently-created document in the family
/// (`<prefix>-…`), or `None` when no document carries one yet.
pub async fn latest_document_identifier(
    pool: &PgPool,
    identifier_prefix: &str,
) -> Result<Option<String>> {
    let pattern = format!("{identifier_prefix}-%");

    let row = sqlx::query(
        r#"
        select identifier
        from documents
        where identifier like $1
        order by created_at_utc desc
        limit 1
        "#,
    )
    .bind(&pattern)
    .fetch_optional(pool)
    .await
    .context("latest_document_identifier failed")?;

    match row {
        None => Ok(None),
        Some(row) => Ok(row.try_get("identifier")?),
    }
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub doc_id: Uuid,
    pub doc_type: String, // pedido | cotizacion
    pub identifier: Option<String>,
    pub payload: Value,
    pub created_at_utc: DateTime<Utc>,
}

pub async fn insert_document(pool: &PgPool, doc: &NewDocument) -> Result<()> {
    sqlx::query(
        r#"
        insert into documents (doc_id, doc_type, identifier, payload, created_at_utc)
        values ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(doc.doc_id)
    .bind(&doc.doc_type)
    .bind(&doc.identifier)
    .bind(&doc.payload)
    .bind(doc.created_at_utc)
    .execute(pool)
    .await
    .context("insert_document failed")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// Permissions held by a role, or `None` when the role does not exist.
pub async fn fetch_role_permissions(pool: &PgPool, role_name: &str) -> Result<Option<Vec<String>>> {
    let row = sqlx::query(
        r#"
        select permissions
        from roles
        where role_name = $1
        "#,
    )
    .bind(role_name)
    .fetch_optional(pool)
    .await
    .context("fetch_role_permissions failed")?;

    match row {
        None => Ok(None),
        Some(row) => {
            let v: Value = row.try_get("permissions")?;
            let perms: Vec<String> = serde_json::from_value(v)
                .map_err(|e| anyhow!("roles.permissions is not a string array: {e}"))?;
            Ok(Some(perms))
        }
    }
}

/// Upsert the full permission set for a role.
pub async fn update_role_permissions(
    pool: &PgPool,
    role_name: &str,
    permissions: &[String],
) -> Result<()> {
    let v = serde_json::to_value(permissions).context("serialize permissions failed")?;

    sqlx::query(
        r#"
        insert into roles (role_name, permissions, updated_at_utc)
        values ($1, $2, now())
        on conflict (role_name)
        do update set permissions = excluded.permissions, updated_at_utc = now()
        "#,
    )
    .bind(role_name)
    .bind(&v)
    .execute(pool)
    .await
    .context("update_role_permissions failed")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Operations log (DB copy; the JSONL file is written by pga-audit)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NewOpsEvent {
    pub op_id: Uuid,
    pub ts_utc: DateTime<Utc>,
    pub operation: String,
    pub detail: Value,
}

pub async fn insert_ops_event(pool: &PgPool, ev: &NewOpsEvent) -> Result<()> {
    sqlx::query(
        r#"
        insert into ops_log (op_id, ts_utc, operation, detail)
        values ($1, $2, $3, $4)
        "#,
    )
    .bind(ev.op_id)
    .bind(ev.ts_utc)
    .bind(&ev.operation)
    .bind(&ev.detail)
    .execute(pool)
    .await
    .context("insert_ops_event failed")?;
    Ok(())
}
