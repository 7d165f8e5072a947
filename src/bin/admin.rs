//! Operator CLI: issue/list/deactivate tenant credentials and inspect cost
//! records. Grounded on the original Python's `scripts/create_api_key_secure.py`
//! and `scripts/check_costs.py`, following the teacher's `clap`-derived
//! subcommand shape.

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use rand::Rng;
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use llm_gateway::config::Settings;
use llm_gateway::models::{CostRecord, Tenant};

#[derive(Parser)]
#[command(name = "llm-gateway-admin")]
#[command(about = "Operator CLI for the llm-gateway: tenant credentials and cost reports")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database URL, defaults to the same env var the server reads.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new tenant and print its plaintext secret once.
    CreateKey {
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 60)]
        rate_limit: i32,
    },
    /// List all tenants.
    ListKeys,
    /// Deactivate a tenant by id.
    DeactivateKey { id: Uuid },
    /// Recent cost records, plus aggregation by provider and by tenant.
    Costs {
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
}

fn random_secret() -> String {
    let mut rng = rand::thread_rng();
    (0..32)
        .map(|_| {
            let charset = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
            charset[rng.gen_range(0..charset.len())] as char
        })
        .collect()
}

async fn create_key(pool: &PgPool, name: &str, rate_limit: i32) -> Result<()> {
    let secret = random_secret();
    let key_hash = bcrypt::hash(&secret, bcrypt::DEFAULT_COST)?;
    let id = Uuid::new_v4();

    sqlx::query(
        "INSERT INTO api_keys (id, key_hash, name, rate_limit_per_minute, created_at, is_active) \
         VALUES ($1, $2, $3, $4, now(), true)",
    )
    .bind(id)
    .bind(&key_hash)
    .bind(name)
    .bind(rate_limit)
    .execute(pool)
    .await?;

    println!("{}", "tenant created".green().bold());
    println!("  id:     {id}");
    println!("  name:   {name}");
    println!("  secret: {}", secret.yellow());
    println!("{}", "(store this now — it will not be shown again)".dimmed());
    Ok(())
}

async fn list_keys(pool: &PgPool) -> Result<()> {
    let rows: Vec<Tenant> = sqlx::query_as::<_, Tenant>(
        "SELECT id, key_hash, name, rate_limit_per_minute, created_at, is_active FROM api_keys \
         ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;

    for row in rows {
        let status = if row.is_active { "active".green() } else { "inactive".red() };
        println!(
            "{}  {:<20}  limit={:<5}  {}  {}",
            row.id,
            row.name.unwrap_or_default(),
            row.rate_limit_per_minute,
            status,
            row.created_at,
        );
    }
    Ok(())
}

async fn deactivate_key(pool: &PgPool, id: Uuid) -> Result<()> {
    let result = sqlx::query("UPDATE api_keys SET is_active = false WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        println!("{}", format!("no tenant found with id {id}").red());
    } else {
        println!("{}", format!("tenant {id} deactivated").green());
    }
    Ok(())
}

async fn show_costs(pool: &PgPool, limit: i64) -> Result<()> {
    let recent: Vec<CostRecord> = sqlx::query_as::<_, CostRecord>(
        "SELECT id, api_key_id, request_id, provider, model, tokens_in, tokens_out, cost_usd, \
         latency_ms, created_at FROM cost_records ORDER BY created_at DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    println!("{}", "recent cost records".bold());
    for row in &recent {
        println!(
            "  {}  {:<12} {:<20} ${:<10} {}",
            row.request_id, row.provider, row.model, row.cost_usd, row.created_at
        );
    }

    #[derive(sqlx::FromRow)]
    struct ByProvider {
        provider: String,
        total: Decimal,
    }

    let by_provider: Vec<ByProvider> = sqlx::query_as(
        "SELECT provider, COALESCE(SUM(cost_usd), 0) AS total FROM cost_records GROUP BY provider ORDER BY total DESC",
    )
    .fetch_all(pool)
    .await?;

    println!();
    println!("{}", "total cost by provider".bold());
    for row in by_provider {
        println!("  {:<15} ${}", row.provider, row.total);
    }

    #[derive(sqlx::FromRow)]
    struct ByTenant {
        api_key_id: Uuid,
        total: Decimal,
    }

    let by_tenant: Vec<ByTenant> = sqlx::query_as(
        "SELECT api_key_id, COALESCE(SUM(cost_usd), 0) AS total FROM cost_records GROUP BY api_key_id ORDER BY total DESC",
    )
    .fetch_all(pool)
    .await?;

    println!();
    println!("{}", "total cost by tenant".bold());
    for row in by_tenant {
        println!("  {}  ${}", row.api_key_id, row.total);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt().with_env_filter("info").init();

    let database_url = cli.database_url.unwrap_or_else(|| Settings::from_env().database_url);
    let pool = PgPoolOptions::new().max_connections(5).connect(&database_url).await?;

    match cli.command {
        Commands::CreateKey { name, rate_limit } => create_key(&pool, &name, rate_limit).await?,
        Commands::ListKeys => list_keys(&pool).await?,
        Commands::DeactivateKey { id } => deactivate_key(&pool, id).await?,
        Commands::Costs { limit } => show_costs(&pool, limit).await?,
    }

    Ok(())
}
