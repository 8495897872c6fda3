use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};

use crate::models::*;

fn map_cluster_row(row: &SqliteRow) -> Result<ClusterRecord> {
    let name: String = row.get("name");
    let status: String = row.get("status");
    let class: String = row.get("cluster_class");

    let non_negative = |column: &str| -> Result<i64> {
        let v: i64 = row.get(column);
        if v < 0 {
            anyhow::bail!("cluster '{}' has negative {}: {}", name, column, v);
        }
        Ok(v)
    };

    let max_cpus = u32::try_from(non_negative("max_cpus")?)
        .with_context(|| format!("cluster '{}' max_cpus out of range", name))?;
    let memory_gb = non_negative("memory_gb")? as u64;
    let gpu_count = u32::try_from(non_negative("gpu_count")?)
        .with_context(|| format!("cluster '{}' gpu_count out of range", name))?;
    let jobs_in_queue = u32::try_from(non_negative("jobs_in_queue")?)
        .with_context(|| format!("cluster '{}' jobs_in_queue out of range", name))?;
    let status: ClusterStatus = status
        .parse()
        .map_err(|e: String| anyhow::anyhow!("cluster '{}': {}", name, e))?;

    Ok(ClusterRecord {
        name,
        max_cpus,
        memory_gb,
        gpu_count,
        gpu_description: row.get("gpu_description"),
        jobs_in_queue,
        owner: row.get("owner"),
        class: ClusterClass::parse(&class),
        status,
    })
}

pub struct ClusterRepo;

impl ClusterRepo {
    /// All clusters in declaration order
    pub async fn list(pool: &Pool<Sqlite>) -> Result<Vec<ClusterRecord>> {
        let rows = sqlx::query("SELECT * FROM clusters ORDER BY position, id")
            .fetch_all(pool)
            .await?;
        rows.iter().map(map_cluster_row).collect()
    }

    pub async fn count(pool: &Pool<Sqlite>) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM clusters")
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }

    /// Append a cluster after every existing one
    pub async fn insert(pool: &Pool<Sqlite>, cluster: &ClusterRecord) -> Result<()> {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO clusters (position, name, max_cpus, memory_gb, gpu_count, gpu_description,
                                  jobs_in_queue, owner, cluster_class, status, created_at, updated_at)
            VALUES ((SELECT COALESCE(MAX(position), -1) + 1 FROM clusters), ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&cluster.name)
        .bind(cluster.max_cpus as i64)
        .bind(cluster.memory_gb as i64)
        .bind(cluster.gpu_count as i64)
        .bind(&cluster.gpu_description)
        .bind(cluster.jobs_in_queue as i64)
        .bind(&cluster.owner)
        .bind(cluster.class.as_str())
        .bind(cluster.status.as_str())
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to insert cluster '{}'", cluster.name))?;
        Ok(())
    }
}
