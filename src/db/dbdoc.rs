use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Error as SqlxError;
use std::time::Duration;
use tracing::{error, info};

use super::{DocStore, StoreError, StoreFuture};

/// Document row from the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DocumentRow {
    pub id: String,
    pub content: String,
}

/// Postgres backed document store
pub struct PgDocStore {
    pool: PgPool,
}

impl PgDocStore {
    /// Create a new database connection pool
    ///
    /// # Arguments
    /// * `database_url` - PostgreSQL connection string
    ///
    /// # Returns
    /// * `Result<Self, SqlxError>` - Store with a connected pool or error
    pub async fn connect(database_url: &str) -> Result<Self, SqlxError> {
        info!("Connecting to database...");

        let pool = PgPoolOptions::new()
            .max_connections(20)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600)) // Close idle connections after 10 minutes
            .max_lifetime(Duration::from_secs(1800)) // Recycle connections after 30 minutes
            .connect(database_url)
            .await?;

        info!("Database connection pool created successfully");

        Ok(Self { pool })
    }

    /// Create the documents table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), SqlxError> {
        let query_sql = r#"
            CREATE TABLE IF NOT EXISTS documents (
                id TEXT PRIMARY KEY,
                content TEXT NOT NULL DEFAULT ''
            );
        "#;
        sqlx::query(query_sql).execute(&self.pool).await?;
        info!("Documents table ready");
        Ok(())
    }

    /// Load a document row by id
    pub async fn load_document(&self, id: &str) -> Result<Option<DocumentRow>, SqlxError> {
        let row = sqlx::query_as::<_, DocumentRow>("SELECT id, content FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await;

        if let Err(e) = &row {
            let pool_idle = self.pool.num_idle() as u32;
            error!(
                "Failed to load document {}: {}. Pool state: {} idle, {} total",
                id,
                e,
                pool_idle,
                self.pool.size()
            );
        }
        row
    }

    /// Insert or replace the content of a document
    pub async fn upsert_document(&self, id: &str, content: &str) -> Result<(), SqlxError> {
        let query_sql = r#"
            INSERT INTO documents (id, content)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET content = EXCLUDED.content;
        "#;
        let res = sqlx::query(query_sql)
            .bind(id)
            .bind(content)
            .execute(&self.pool)
            .await;

        if let Err(e) = &res {
            error!("Failed to upsert document {}: {}", id, e);
        }
        res.map(|_| ())
    }

    /// Insert a document only if the id is free, then return the stored content
    pub async fn insert_document_if_absent(&self, id: &str, content: &str) -> Result<String, SqlxError> {
        let query_sql = r#"
            INSERT INTO documents (id, content)
            VALUES ($1, $2)
            ON CONFLICT (id) DO NOTHING;
        "#;
        let inserted = sqlx::query(query_sql)
            .bind(id)
            .bind(content)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to create document {}: {}", id, e);
                e
            })?
            .rows_affected();

        if inserted == 1 {
            return Ok(content.to_string());
        }
        match self.load_document(id).await? {
            Some(row) => Ok(row.content),
            None => Err(SqlxError::RowNotFound),
        }
    }
}

impl DocStore for PgDocStore {
    fn get<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<String>> {
        Box::pin(async move {
            let row = self.load_document(id).await.map_err(StoreError::from)?;
            Ok(row.map(|r| r.content))
        })
    }

    fn put<'a>(&'a self, id: &'a str, content: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move { self.upsert_document(id, content).await.map_err(StoreError::from) })
    }

    fn create<'a>(&'a self, id: &'a str, content: &'a str) -> StoreFuture<'a, String> {
        Box::pin(async move {
            self.insert_document_if_absent(id, content)
                .await
                .map_err(StoreError::from)
        })
    }
}
