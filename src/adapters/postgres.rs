use crate::domain::model::SimRecord;
use crate::domain::ports::SimStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS sim_records (
    id SERIAL PRIMARY KEY,
    imsi VARCHAR(32) NOT NULL,
    pin1 VARCHAR(16),
    puk1 VARCHAR(16),
    pin2 VARCHAR(16),
    puk2 VARCHAR(16),
    aam1 VARCHAR(64),
    ki_umts_enc VARCHAR(128),
    acc VARCHAR(16),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX IF NOT EXISTS idx_sim_records_imsi ON sim_records (imsi);
"#;

/// Postgres-backed SIM store over a single long-lived connection.
#[derive(Debug, Clone)]
pub struct PgSimStore {
    pool: PgPool,
}

impl PgSimStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        // 只用一條連線，檔案是逐一處理的
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .connect(database_url)
            .await?;

        sqlx::query("SELECT 1").execute(&pool).await?;
        tracing::info!("🗄️ Connected to the database successfully");

        Ok(Self { pool })
    }

    /// Creates the `sim_records` table and its IMSI index when missing.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        tracing::debug!("sim_records schema ensured");
        Ok(())
    }
}

#[async_trait]
impl SimStore for PgSimStore {
    async fn insert_record(&self, record: &SimRecord) -> Result<()> {
        sqlx::query(
            "INSERT INTO sim_records (imsi, pin1, puk1, pin2, puk2, aam1, ki_umts_enc, acc)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&record.imsi)
        .bind(&record.pin1)
        .bind(&record.puk1)
        .bind(&record.pin2)
        .bind(&record.puk2)
        .bind(&record.aam1)
        .bind(&record.ki_umts_enc)
        .bind(&record.acc)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn exists_by_imsi(&self, imsi: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM sim_records WHERE imsi = $1)")
                .bind(imsi)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}
