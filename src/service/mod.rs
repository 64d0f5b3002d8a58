use crate::{
    dto::{CreateNoteRequest, NoteResponse, UpdateNoteRequest},
    models::NotePatch,
    repository::{NoteRepository, RepositoryError},
};

use std::{fmt, sync::Arc};

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdField {
    Note,
    User,
}

impl fmt::Display for IdField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Note => f.write_str("note ID"),
            Self::User => f.write_str("user_id"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NoteServiceError {
    #[error("Invalid {field} format. Must be a valid UUID.")]
    Validation { field: IdField },

    /// PostgreSQL `TEXT` cannot store U+0000.
    #[error("Invalid {field}: NUL characters are not allowed.")]
    InvalidText { field: &'static str },

    #[error("Note not found or you don't have permission to {action} it")]
    NotFound { action: &'static str },

    #[error("Storage failure: {0}")]
    Storage(#[from] RepositoryError),
}

const ACCESS: &str = "access";
const DELETE: &str = "delete";

fn parse_id(field: IdField, raw: &str) -> Result<Uuid, NoteServiceError> {
    Uuid::parse_str(raw).map_err(|_| NoteServiceError::Validation { field })
}

fn check_text(field: &'static str, value: Option<&str>) -> Result<(), NoteServiceError> {
    match value {
        Some(text) if text.contains('\0') => Err(NoteServiceError::InvalidText { field }),
        _ => Ok(()),
    }
}

#[derive(Clone)]
pub struct NoteService {
    repo: Arc<dyn NoteRepository>,
}

impl NoteService {
    pub const fn new(repo: Arc<dyn NoteRepository>) -> Self {
        Self { repo }
    }

    #[tracing::instrument(skip(self, request))]
    pub async fn create_note(
        &self,
        user_id: &str,
        request: CreateNoteRequest,
    ) -> Result<NoteResponse, NoteServiceError> {
        let user_id = parse_id(IdField::User, user_id)?;
        check_text("title", Some(request.title.as_str()))?;
        check_text("content", request.content.as_deref())?;

        let note = self
            .repo
            .insert(user_id, request.title, request.content)
            .await?;
        tracing::debug!(note_id = %note.id, "note created");

        Ok(note.into())
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_all_notes(
        &self,
        user_id: &str,
    ) -> Result<Vec<NoteResponse>, NoteServiceError> {
        let user_id = parse_id(IdField::User, user_id)?;

        let notes = self.repo.list_by_owner(user_id).await?;

        Ok(notes.into_iter().map(NoteResponse::from).collect())
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_one_note(
        &self,
        note_id: &str,
        user_id: &str,
    ) -> Result<NoteResponse, NoteServiceError> {
        let note_id = parse_id(IdField::Note, note_id)?;
        let user_id = parse_id(IdField::User, user_id)?;

        self.repo
            .find_owned(note_id, user_id)
            .await?
            .map(NoteResponse::from)
            .ok_or(NoteServiceError::NotFound { action: ACCESS })
    }

    /// An empty patch writes nothing and returns the stored note with its
    /// `updated_at` untouched.
    #[tracing::instrument(skip(self, request))]
    pub async fn update_note(
        &self,
        note_id: &str,
        user_id: &str,
        request: UpdateNoteRequest,
    ) -> Result<NoteResponse, NoteServiceError> {
        let note_id = parse_id(IdField::Note, note_id)?;
        let user_id = parse_id(IdField::User, user_id)?;
        let patch = NotePatch::from(request);
        check_text("title", patch.title.as_deref())?;
        check_text("content", patch.content.as_ref().and_then(Option::as_deref))?;

        let note = if patch.is_empty() {
            self.repo.find_owned(note_id, user_id).await?
        } else {
            self.repo.update_owned(note_id, user_id, patch).await?
        };

        note.map(NoteResponse::from)
            .ok_or(NoteServiceError::NotFound { action: ACCESS })
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_note(&self, note_id: &str, user_id: &str) -> Result<(), NoteServiceError> {
        let note_id = parse_id(IdField::Note, note_id)?;
        let user_id = parse_id(IdField::User, user_id)?;

        if self.repo.delete_owned(note_id, user_id).await? {
            Ok(())
        } else {
            Err(NoteServiceError::NotFound { action: DELETE })
        }
    }

    pub async fn is_ready(&self) -> bool {
        match self.repo.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("readiness check failed: {e}");
                false
            }
        }
    }
}
