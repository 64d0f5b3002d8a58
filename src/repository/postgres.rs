use std::time::Duration;

use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod, Runtime};
use tokio_postgres::{NoTls, Row};
use uuid::Uuid;

use super::{NoteRepository, RepositoryError, embedded::migrations};
use crate::models::{Note, NotePatch};

pub struct PgRepository {
    pool: Pool,
}

impl PgRepository {
    /// Builds the pool and checks out one connection so a bad DSN fails at startup.
    pub async fn new(
        database_dsn: &str,
        max_size: usize,
        wait_timeout: Duration,
    ) -> Result<Self, RepositoryError> {
        let pg_config: tokio_postgres::Config = database_dsn.parse()?;
        let manager = Manager::from_config(
            pg_config,
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );

        let pool = Pool::builder(manager)
            .max_size(max_size)
            .wait_timeout(Some(wait_timeout))
            .create_timeout(Some(wait_timeout))
            .runtime(Runtime::Tokio1)
            .build()?;

        drop(pool.get().await?);

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await?;
        let client: &mut tokio_postgres::Client = &mut conn;
        let migrations_report = migrations::runner().run_async(client).await?;

        for migration in migrations_report.applied_migrations() {
            tracing::info!(
                "Migration Applied -  Name: {}, Version: {}",
                migration.name(),
                migration.version()
            );
        }

        tracing::info!("DB migrations finished!");

        Ok(())
    }
}

fn note_from_row(row: &Row) -> Note {
    Note {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl NoteRepository for PgRepository {
    async fn insert(
        &self,
        user_id: Uuid,
        title: String,
        content: Option<String>,
    ) -> Result<Note, RepositoryError> {
        let client = self.pool.get().await?;
        let id = Uuid::new_v4();

        let row = client
            .query_one(
                "INSERT INTO notes (id, user_id, title, content) VALUES ($1, $2, $3, $4) \
                 RETURNING id, user_id, title, content, created_at, updated_at",
                &[&id, &user_id, &title, &content],
            )
            .await?;

        Ok(note_from_row(&row))
    }

    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<Note>, RepositoryError> {
        let client = self.pool.get().await?;

        let rows = client
            .query(
                "SELECT id, user_id, title, content, created_at, updated_at FROM notes \
                 WHERE user_id = $1 ORDER BY created_at ASC, id ASC",
                &[&user_id],
            )
            .await?;

        Ok(rows.iter().map(note_from_row).collect())
    }

    async fn find_owned(&self, id: Uuid, user_id: Uuid) -> Result<Option<Note>, RepositoryError> {
        let client = self.pool.get().await?;

        let row = client
            .query_opt(
                "SELECT id, user_id, title, content, created_at, updated_at FROM notes \
                 WHERE id = $1 AND user_id = $2",
                &[&id, &user_id],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn update_owned(
        &self,
        id: Uuid,
        user_id: Uuid,
        patch: NotePatch,
    ) -> Result<Option<Note>, RepositoryError> {
        let client = self.pool.get().await?;

        let set_content = patch.content.is_some();
        let content = patch.content.flatten();

        let row = client
            .query_opt(
                "UPDATE notes \
                 SET title = COALESCE($3::text, title), \
                 content = CASE WHEN $4::boolean THEN $5::text ELSE content END, \
                 updated_at = GREATEST(NOW(), created_at) \
                 WHERE id = $1 AND user_id = $2 \
                 RETURNING id, user_id, title, content, created_at, updated_at",
                &[&id, &user_id, &patch.title, &set_content, &content],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> Result<bool, RepositoryError> {
        let client = self.pool.get().await?;

        let rows = client
            .execute(
                "DELETE FROM notes WHERE id = $1 AND user_id = $2",
                &[&id, &user_id],
            )
            .await?;

        Ok(rows == 1)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        let client = self.pool.get().await?;
        client.execute("SELECT 1", &[]).await?;

        Ok(())
    }
}
