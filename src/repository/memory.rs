use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{NoteRepository, RepositoryError};
use crate::models::{Note, NotePatch};

/// In-process stand-in for `PgRepository` with the same owner scoping.
#[derive(Default)]
pub struct MemoryRepository {
    notes: tokio::sync::Mutex<HashMap<Uuid, Note>>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following call fail as if the pool were gone.
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Number of repository calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<(), RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(deadpool_postgres::PoolError::Closed.into());
        }

        Ok(())
    }
}

#[async_trait]
impl NoteRepository for MemoryRepository {
    async fn insert(
        &self,
        user_id: Uuid,
        title: String,
        content: Option<String>,
    ) -> Result<Note, RepositoryError> {
        self.enter()?;

        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            user_id,
            title,
            content,
            created_at: now,
            updated_at: now,
        };
        self.notes.lock().await.insert(note.id, note.clone());

        Ok(note)
    }

    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<Note>, RepositoryError> {
        self.enter()?;

        let mut notes: Vec<Note> = self
            .notes
            .lock()
            .await
            .values()
            .filter(|note| note.user_id == user_id)
            .cloned()
            .collect();
        notes.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Ok(notes)
    }

    async fn find_owned(&self, id: Uuid, user_id: Uuid) -> Result<Option<Note>, RepositoryError> {
        self.enter()?;

        Ok(self
            .notes
            .lock()
            .await
            .get(&id)
            .filter(|note| note.user_id == user_id)
            .cloned())
    }

    async fn update_owned(
        &self,
        id: Uuid,
        user_id: Uuid,
        patch: NotePatch,
    ) -> Result<Option<Note>, RepositoryError> {
        self.enter()?;

        let mut notes = self.notes.lock().await;
        let Some(note) = notes.get_mut(&id).filter(|note| note.user_id == user_id) else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            note.title = title;
        }
        if let Some(content) = patch.content {
            note.content = content;
        }
        note.updated_at = Utc::now().max(note.created_at);

        Ok(Some(note.clone()))
    }

    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> Result<bool, RepositoryError> {
        self.enter()?;

        let mut notes = self.notes.lock().await;
        if notes.get(&id).is_some_and(|note| note.user_id == user_id) {
            notes.remove(&id);
            return Ok(true);
        }

        Ok(false)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.enter()
    }
}
