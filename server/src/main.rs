mod config;
mod graphql;
mod http;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use platform_db::{DbPool, connect};
use platform_obs::{ObsConfig, init_tracing};
use products_hr::{DbStore, HrService, MemoryStore, seed::seed_store};
use tracing::{info, warn};

use crate::{
    config::{AppConfig, StoreBackend},
    http::{AppState, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "hr-server", version, about = "Employee, reporting structure and compensation service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP + GraphQL server.
    Serve(ServeCommand),
    /// Run database migrations.
    #[command(subcommand)]
    Migrate(MigrateCommand),
    /// Load the bundled employee hierarchy into the database.
    Seed,
    /// Print the GraphQL schema snapshot.
    #[command(name = "schema:print")]
    SchemaPrint {
        #[arg(long, value_name = "FILE", help = "Destination file path")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Apply pending migrations.
    Up,
    /// Rollback the most recent migration.
    Down,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,
    #[arg(long, help = "Allow starting even when migrations are pending")]
    allow_dirty: bool,
}

impl From<&ServeCommand> for ServeConfig {
    fn from(value: &ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(ObsConfig::default())?;
    let cli = Cli::parse();
    let app_config = Arc::new(AppConfig::load()?);
    match cli.command {
        Command::Serve(cmd) => run_server(cmd, app_config).await,
        Command::Migrate(action) => match action {
            MigrateCommand::Up => migrate_up(&app_config).await,
            MigrateCommand::Down => migrate_down(&app_config).await,
        },
        Command::Seed => run_seed(&app_config).await,
        Command::SchemaPrint { output } => schema_print(output),
    }
}

async fn run_seed(config: &AppConfig) -> Result<()> {
    if config.store_backend == StoreBackend::Memory {
        bail!("seed writes to the database; the memory backend seeds itself on start");
    }
    let pool = setup_pool(config).await?;
    ensure_migrations(&pool, false).await?;
    let count = seed_store(&DbStore::new(pool)).await?;
    info!(count, "seed complete");
    Ok(())
}

fn schema_print(path: Option<PathBuf>) -> Result<()> {
    let hr = HrService::from_store(Arc::new(MemoryStore::new()));
    let sdl = graphql::build_schema(hr).sdl();
    match path {
        Some(target) => {
            std::fs::write(&target, sdl)
                .with_context(|| format!("failed to write {}", target.display()))?;
            info!(path = %target.display(), "schema snapshot written");
        }
        None => println!("{sdl}"),
    }
    Ok(())
}

async fn setup_pool(config: &AppConfig) -> Result<DbPool> {
    connect(&config.database).await.map_err(Into::into)
}

async fn run_server(cmd: ServeCommand, config: Arc<AppConfig>) -> Result<()> {
    let (hr, pool) = match config.store_backend {
        StoreBackend::Memory => {
            warn!("using in-memory store; records are lost on shutdown");
            let store = Arc::new(MemoryStore::new());
            if config.seed_on_start {
                seed_store(store.as_ref()).await?;
            }
            (HrService::from_store(store), None)
        }
        StoreBackend::Postgres => {
            let pool = setup_pool(&config).await?;
            ensure_migrations(&pool, cmd.allow_dirty).await?;
            let store = Arc::new(DbStore::new(pool.clone()));
            if config.seed_on_start {
                seed_store(store.as_ref()).await?;
            }
            (HrService::from_store(store), Some(pool))
        }
    };
    let schema = graphql::build_schema(hr.clone());
    let state = AppState {
        hr,
        schema,
        config: config.clone(),
        pool,
    };
    http::serve((&cmd).into(), state).await
}

async fn ensure_migrations(pool: &DbPool, allow_dirty: bool) -> Result<()> {
    let pending = Migrator::get_pending_migrations(pool).await?;
    if !pending.is_empty() && !allow_dirty {
        anyhow::bail!(
            "pending migrations detected; run `cargo run -p server -- migrate up` or pass --allow-dirty"
        );
    }
    Ok(())
}

async fn migrate_up(config: &AppConfig) -> Result<()> {
    let pool = setup_pool(config).await?;
    Migrator::up(&pool, None).await?;
    info!("database migrations applied");
    Ok(())
}

async fn migrate_down(config: &AppConfig) -> Result<()> {
    let pool = setup_pool(config).await?;
    Migrator::down(&pool, Some(1)).await?;
    info!("most recent migration rolled back");
    Ok(())
}
