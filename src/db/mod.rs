mod clusters;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};

use crate::models::ClusterRecord;
use crate::registry::{demo_fleet, InventorySource};

use clusters::ClusterRepo;

/// Store is the SQLite-backed fleet inventory
#[derive(Clone)]
pub struct Store {
    pool: Pool<Sqlite>,
}

impl Store {
    /// Create a new database store with a specific pool size
    pub async fn with_pool_size(db_path: &str, max_connections: u32) -> Result<Self> {
        let db_url = format!("sqlite:{}?mode=rwc", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(&db_url)
            .await
            .context("Failed to connect to database")?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Run database migrations and seed the demo fleet into an empty table
    async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;

        if ClusterRepo::count(&self.pool).await? == 0 {
            for cluster in demo_fleet() {
                self.insert_cluster(&cluster).await?;
            }
            tracing::info!("Seeded default cluster inventory");
        }
        Ok(())
    }

    pub async fn list_clusters(&self) -> Result<Vec<ClusterRecord>> {
        ClusterRepo::list(&self.pool).await
    }

    pub async fn insert_cluster(&self, cluster: &ClusterRecord) -> Result<()> {
        ClusterRepo::insert(&self.pool, cluster).await
    }
}

#[async_trait]
impl InventorySource for Store {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn load(&self) -> Result<Vec<ClusterRecord>> {
        self.list_clusters().await
    }
}
