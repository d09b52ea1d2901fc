use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use uuid::Uuid;

use lifecycle_core::domain::{HasLifecycle, Tenant};
use lifecycle_core::policy::AllowAll;
use lifecycle_core::services::SoftDeleteService;
use lifecycle_infrastructure::{create_pool, run_migrations, PgChildTableGuard, PgTenantRepository};
use lifecycle_shared::config::AppConfig;
use lifecycle_shared::telemetry::{init_telemetry, LogFormat};

type TenantLifecycle = SoftDeleteService<Tenant, PgTenantRepository, AllowAll, PgChildTableGuard>;

#[derive(Parser)]
#[command(name = "lifecycle-audit")]
#[command(about = "Inspect and recover soft-deleted tenants")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Operator id recorded as the acting user
    #[arg(short, long, env = "LIFECYCLE_ACTOR", global = true)]
    actor: Option<Uuid>,

    /// Apply pending schema migrations before running the command
    #[arg(long, global = true)]
    migrate: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Active and deleted tenant counts
    Counts,
    /// List deleted tenants, optionally by who deleted them or when
    ListDeleted {
        #[arg(long)]
        by: Option<Uuid>,
        /// RFC 3339 lower bound on deleted_at (inclusive)
        #[arg(long)]
        since: Option<DateTime<Utc>>,
        /// RFC 3339 upper bound on deleted_at (inclusive), defaults to now
        #[arg(long)]
        until: Option<DateTime<Utc>>,
    },
    /// Show one tenant regardless of status
    Show { id: Uuid },
    /// Soft delete a tenant that has no active client apps
    Delete { id: Uuid },
    /// Reactivate a soft-deleted tenant
    Restore { id: Uuid },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load()?;
    let format = LogFormat::from_str(&config.app.log_format).unwrap_or_default();
    init_telemetry(&config.app.log_filter, format)?;

    info!("{} ({}) starting", config.app.name, config.app.env);

    let pool = create_pool(&config.database).await?;
    if cli.migrate {
        run_migrations(&pool).await?;
        info!("Migrations applied");
    }

    let service: TenantLifecycle = SoftDeleteService::new(
        Arc::new(PgTenantRepository::new(pool.clone())),
        Arc::new(AllowAll),
        Arc::new(PgChildTableGuard::client_apps_of_tenant(pool)),
    )
    .with_settings(config.lifecycle.clone());

    if let Err(e) = run(cli, &service).await {
        error!("Command failed: {}", e);
        return Err(e);
    }

    Ok(())
}

async fn run(cli: Cli, service: &TenantLifecycle) -> anyhow::Result<()> {
    let actor = cli
        .actor
        .ok_or_else(|| anyhow::anyhow!("an operator id is required (--actor or LIFECYCLE_ACTOR)"))?;

    match cli.command {
        Commands::Counts => {
            let active = service.count_active().await?;
            let deleted = service.count_deleted(&actor).await?;
            println!("active:  {}", active);
            println!("deleted: {}", deleted);
        }
        Commands::ListDeleted { by, since, until } => {
            let tenants = match DeletedQuery::from_args(by, since, until, Utc::now()) {
                DeletedQuery::All => service.find_all_deleted(&actor).await?,
                DeletedQuery::ByActor(by) => service.find_deleted_by_actor(&by, &actor).await?,
                DeletedQuery::Window { start, end, by } => service
                    .find_deleted_between(start, end, &actor)
                    .await?
                    .into_iter()
                    .filter(|t| by.map_or(true, |by| t.lifecycle().deleted_by() == Some(by)))
                    .collect(),
            };
            print_deleted(&tenants);
        }
        Commands::Show { id } => match service.find_including_deleted(&id, &actor).await? {
            Some(tenant) => println!("{}", serde_json::to_string_pretty(&tenant)?),
            None => anyhow::bail!("tenant {} not found", id),
        },
        Commands::Delete { id } => {
            service.soft_delete_strict(&id, &actor).await?;
            println!("tenant {} soft deleted", id);
        }
        Commands::Restore { id } => {
            service.reactivate_strict(&id, &actor).await?;
            println!("tenant {} reactivated", id);
        }
    }

    Ok(())
}

/// Which store query `list-deleted` runs for a given flag combination.
#[derive(Debug, PartialEq, Eq)]
enum DeletedQuery {
    All,
    ByActor(Uuid),
    /// Inclusive `deleted_at` window, optionally narrowed to one deleter.
    Window {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        by: Option<Uuid>,
    },
}

impl DeletedQuery {
    /// A missing `since` means the epoch and a missing `until` means `now`.
    fn from_args(
        by: Option<Uuid>,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        match (by, since, until) {
            (None, None, None) => DeletedQuery::All,
            (Some(by), None, None) => DeletedQuery::ByActor(by),
            (by, since, until) => DeletedQuery::Window {
                start: since.unwrap_or_default(),
                end: until.unwrap_or(now),
                by,
            },
        }
    }
}

fn print_deleted(tenants: &[Tenant]) {
    if tenants.is_empty() {
        println!("no deleted tenants");
        return;
    }

    println!("{:<36}  {:<24}  {:<25}  {}", "ID", "SLUG", "DELETED AT", "DELETED BY");
    for tenant in tenants {
        let life = tenant.lifecycle();
        println!(
            "{:<36}  {:<24}  {:<25}  {}",
            tenant.id,
            tenant.slug,
            life.deleted_at().map(|at| at.to_rfc3339()).unwrap_or_default(),
            life.deleted_by().map(|by| by.to_string()).unwrap_or_default(),
        );
    }
}
