mod embedded;
#[cfg(test)]
pub mod memory;
mod postgres;

pub use postgres::PgRepository;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Note, NotePatch};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("failed to build connection pool: {0}")]
    PoolBuild(#[from] deadpool_postgres::BuildError),

    #[error("failed to acquire database connection: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("database error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] refinery::Error),
}

/// Storage for notes. Every lookup and mutation of a single note is scoped
/// to its owner, so a foreign note looks exactly like a missing one.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn insert(
        &self,
        user_id: Uuid,
        title: String,
        content: Option<String>,
    ) -> Result<Note, RepositoryError>;

    /// Ordered by `created_at`, oldest first.
    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<Note>, RepositoryError>;

    async fn find_owned(&self, id: Uuid, user_id: Uuid) -> Result<Option<Note>, RepositoryError>;

    /// Applies a non-empty patch and refreshes `updated_at` in one statement.
    async fn update_owned(
        &self,
        id: Uuid,
        user_id: Uuid,
        patch: NotePatch,
    ) -> Result<Option<Note>, RepositoryError>;

    /// Returns `false` when nothing matched.
    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> Result<bool, RepositoryError>;

    async fn ping(&self) -> Result<(), RepositoryError>;
}
