use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pga_db::PgSequenceStore;
use pga_sequence::ReconcileError;
use serde_json::{json, Value};
use sqlx::PgPool;
use std::time::Duration;

/// Bounded timeout around store-backed sequence operations.
const STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// Ops-log path; override with PGA_OPS_LOG.
const DEFAULT_OPS_LOG: &str = "exports/ops.jsonl";

#[derive(Parser)]
#[command(name = "pga")]
#[command(about = "Pangea admin CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database commands
    Db {
        #[command(subcommand)]
        cmd: DbCmd,
    },

    /// Sequence counter maintenance
    Sequence {
        #[command(subcommand)]
        cmd: SequenceCmd,
    },

    /// Role permission maintenance
    Roles {
        #[command(subcommand)]
        cmd: RolesCmd,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> env -> overrides)
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[derive(Subcommand)]
enum DbCmd {
    Status,

    /// Apply SQL migrations.
    Migrate,
}

#[derive(Subcommand)]
enum SequenceCmd {
    /// Recompute the counter from the latest stored identifier.
    Reconcile {
        /// Counter key (e.g. pedido)
        #[arg(long)]
        sequence: String,

        /// Identifier family prefix (e.g. PED)
        #[arg(long)]
        prefix: String,
    },

    /// Mint the next identifier in the family.
    Next {
        /// Counter key (e.g. pedido)
        #[arg(long)]
        sequence: String,

        /// Identifier family prefix (e.g. PED)
        #[arg(long)]
        prefix: String,
    },

    /// Print the stored counter value.
    Status {
        /// Counter key (e.g. pedido)
        #[arg(long)]
        sequence: String,
    },
}

#[derive(Subcommand)]
enum RolesCmd {
    /// Report missing/unexpected permissions. Never writes.
    Audit {
        /// Role name
        #[arg(long)]
        role: String,

        /// Required permissions
        #[arg(long = "require", required = true)]
        require: Vec<String>,
    },

    /// Grant missing permissions (union write-back). Never revokes.
    Reconcile {
        /// Role name
        #[arg(long)]
        role: String,

        /// Required permissions
        #[arg(long = "require", required = true)]
        require: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env.local if present (dev convenience). Silent if the file
    // does not exist; production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {e:#}");
        std::process::exit(exit_code_for(&e));
    }
}

/// 0 success, 2 invalid argument, 3 store unavailable, 1 anything else.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ReconcileError>() {
        Some(ReconcileError::InvalidArgument(_)) => 2,
        Some(ReconcileError::StoreUnavailable(_)) => 3,
        None => 1,
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.cmd {
        Commands::Db { cmd } => {
            let pool = pga_db::connect_from_env().await?;
            match cmd {
                DbCmd::Status => {
                    let s = pga_db::status(&pool).await?;
                    println!("db_ok={} has_counters_table={}", s.ok, s.has_counters_table);
                }
                DbCmd::Migrate => {
                    pga_db::migrate(&pool).await?;
                    println!("migrations_applied=true");
                }
            }
        }

        Commands::Sequence { cmd } => match cmd {
            SequenceCmd::Reconcile { sequence, prefix } => {
                // Bad input must fail before any store call.
                require_nonempty("--sequence", &sequence)?;
                require_nonempty("--prefix", &prefix)?;

                let pool = connect_store().await?;
                let store = PgSequenceStore::new(&pool);

                let outcome = with_store_timeout(pga_sequence::reconcile(
                    &store, &sequence, &prefix,
                ))
                .await?;

                record_op(
                    &pool,
                    "sequence_reconcile",
                    serde_json::to_value(&outcome).context("serialize outcome failed")?,
                )
                .await?;

                println!(
                    "sequence={} previous={} new={} source={} noop={}",
                    outcome.sequence_name,
                    outcome
                        .previous_value
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "none".to_string()),
                    outcome.new_value,
                    source_label(&outcome.source),
                    outcome.is_noop()
                );
            }

            SequenceCmd::Next { sequence, prefix } => {
                require_nonempty("--sequence", &sequence)?;
                require_nonempty("--prefix", &prefix)?;

                let pool = connect_store().await?;
                let store = PgSequenceStore::new(&pool);

                let minted =
                    with_store_timeout(pga_sequence::mint(&store, &sequence, &prefix)).await?;

                record_op(
                    &pool,
                    "sequence_next",
                    json!({
                        "sequence": minted.sequence_name,
                        "identifier": minted.identifier,
                        "value": minted.value,
                    }),
                )
                .await?;

                println!(
                    "sequence={} identifier={} value={}",
                    minted.sequence_name, minted.identifier, minted.value
                );
            }

            SequenceCmd::Status { sequence } => {
                require_nonempty("--sequence", &sequence)?;

                let pool = connect_store().await?;
                match pga_db::fetch_counter(&pool, &sequence).await? {
                    Some(row) => println!(
                        "sequence={} value={} updated_at_utc={}",
                        row.sequence_name,
                        row.value,
                        row.updated_at_utc.to_rfc3339()
                    ),
                    None => println!("sequence={sequence} value=absent"),
                }
            }
        },

        Commands::Roles { cmd } => match cmd {
            RolesCmd::Audit { role, require } => {
                let pool = pga_db::connect_from_env().await?;

                let current = pga_db::fetch_role_permissions(&pool, &role)
                    .await?
                    .with_context(|| format!("role not found: {role}"))?;

                let report = pga_roles::audit(&role, &current, &require);
                println!(
                    "role={} clean={} missing={} unexpected={}",
                    report.role_name,
                    report.is_clean(),
                    join_or_none(&report.missing),
                    join_or_none(&report.unexpected)
                );
            }

            RolesCmd::Reconcile { role, require } => {
                let pool = pga_db::connect_from_env().await?;

                // Missing role is created with exactly the required set.
                let current = pga_db::fetch_role_permissions(&pool, &role)
                    .await?
                    .unwrap_or_default();

                let report = pga_roles::audit(&role, &current, &require);
                if report.is_clean() {
                    println!("role={role} granted=none");
                    return Ok(());
                }

                let plan = pga_roles::apply_plan(&current, &require);
                pga_db::update_role_permissions(&pool, &role, &plan).await?;
                tracing::info!(role = role.as_str(), granted = ?report.missing, "granted missing permissions");

                record_op(
                    &pool,
                    "roles_reconcile",
                    json!({
                        "role": role,
                        "granted": report.missing,
                    }),
                )
                .await?;

                println!("role={} granted={}", role, join_or_none(&report.missing));
            }
        },

        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = pga_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }
    }

    Ok(())
}

fn require_nonempty(flag: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ReconcileError::InvalidArgument(format!("{flag} must not be empty")).into());
    }
    Ok(())
}

/// Connection failures on the sequence path are store-unavailable: the
/// operator gets one taxonomy (and one exit code) for "could not reach
/// the record store", whatever the underlying cause.
async fn connect_store() -> Result<PgPool> {
    pga_db::connect_from_env()
        .await
        .map_err(|e| ReconcileError::StoreUnavailable(format!("{e:#}")).into())
}

async fn with_store_timeout<T>(
    fut: impl std::future::Future<Output = std::result::Result<T, ReconcileError>>,
) -> Result<T> {
    match tokio::time::timeout(STORE_TIMEOUT, fut).await {
        Ok(res) => res.map_err(Into::into),
        Err(_) => Err(ReconcileError::StoreUnavailable(format!(
            "store call timed out after {}s",
            STORE_TIMEOUT.as_secs()
        ))
        .into()),
    }
}

/// Append to the JSONL ops log and mirror into the ops_log table.
async fn record_op(pool: &PgPool, operation: &str, detail: Value) -> Result<()> {
    let path = std::env::var("PGA_OPS_LOG").unwrap_or_else(|_| DEFAULT_OPS_LOG.to_string());
    // resume() seeds the chain from the last line so entries appended by
    // separate CLI invocations still verify as one chain.
    let mut writer = pga_audit::OpsLogWriter::resume(&path, true)?;
    let ev = writer.append(operation, detail)?;

    pga_db::insert_ops_event(
        pool,
        &pga_db::NewOpsEvent {
            op_id: ev.op_id,
            ts_utc: ev.ts_utc,
            operation: ev.operation,
            detail: ev.detail,
        },
    )
    .await?;

    Ok(())
}

fn source_label(source: &pga_sequence::TargetSource) -> &'static str {
    match source {
        pga_sequence::TargetSource::Parsed { .. } => "parsed",
        pga_sequence::TargetSource::NoRecords => "no_records",
        pga_sequence::TargetSource::MalformedIdentifier { .. } => "malformed",
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(",")
    }
}
