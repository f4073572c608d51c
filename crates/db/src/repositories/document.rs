//! Document repository.

use chrono::{DateTime, Utc};
use kakeibo_core::documents::{DocumentUpdate, NewDocument};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use serde::Serialize;
use tracing::info;

use crate::entities::documents;

/// Error types for document operations.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Document not found for this user.
    #[error("Document not found: {0}")]
    NotFound(i32),

    /// Parent folder not found for this user.
    #[error("Parent document not found: {0}")]
    ParentNotFound(i32),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Listing order. Both sort by `sort_order` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentOrder {
    /// Newest created first.
    #[default]
    CreatedDesc,
    /// Most recently edited first.
    UpdatedDesc,
}

/// A document without its body, as shown in lists.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct DocumentSummary {
    /// Document id.
    pub id: i32,
    /// Display title.
    pub title: String,
    /// Display icon.
    pub emoji: String,
    /// Containing folder.
    pub parent_id: Option<i32>,
    /// Whether this entry is a folder.
    pub is_folder: bool,
    /// Manual ordering key.
    pub sort_order: i32,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last edit time.
    pub updated_at: DateTime<Utc>,
}

impl From<documents::Model> for DocumentSummary {
    fn from(doc: documents::Model) -> Self {
        Self {
            id: doc.id,
            title: doc.title,
            emoji: doc.emoji,
            parent_id: doc.parent_id,
            is_folder: doc.is_folder,
            sort_order: doc.sort_order,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

/// Repository for a user's documents.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    db: DatabaseConnection,
}

impl DocumentRepository {
    /// Creates a new document repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the user's documents without bodies.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        user_id: i32,
        order: DocumentOrder,
    ) -> Result<Vec<DocumentSummary>, DbErr> {
        let query = documents::Entity::find()
            .select_only()
            .columns([
                documents::Column::Id,
                documents::Column::Title,
                documents::Column::Emoji,
                documents::Column::ParentId,
                documents::Column::IsFolder,
                documents::Column::SortOrder,
                documents::Column::CreatedAt,
                documents::Column::UpdatedAt,
            ])
            .filter(documents::Column::UserId.eq(user_id))
            .order_by_asc(documents::Column::SortOrder);

        ordered(query, order)
            .order_by_desc(documents::Column::Id)
            .into_model::<DocumentSummary>()
            .all(&self.db)
            .await
    }

    /// Finds one of the user's documents, body included.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(&self, user_id: i32, id: i32) -> Result<Option<documents::Model>, DbErr> {
        documents::Entity::find_by_id(id)
            .filter(documents::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    /// Creates a document or folder with an empty body.
    ///
    /// # Errors
    ///
    /// Returns `ParentNotFound` if the parent is not one of the user's
    /// documents.
    pub async fn create(
        &self,
        user_id: i32,
        doc: NewDocument,
    ) -> Result<documents::Model, DocumentError> {
        if let Some(parent_id) = doc.parent_id {
            self.find(user_id, parent_id)
                .await?
                .ok_or(DocumentError::ParentNotFound(parent_id))?;
        }

        let now = Utc::now();
        let created = documents::ActiveModel {
            user_id: Set(user_id),
            title: Set(doc.title),
            emoji: Set(doc.emoji),
            parent_id: Set(doc.parent_id),
            is_folder: Set(doc.is_folder),
            sort_order: Set(0),
            content: Set(String::new()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!(user_id, document_id = created.id, is_folder = created.is_folder, "Document created");
        Ok(created)
    }

    /// Replaces title, content and emoji, and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the document is not the user's.
    pub async fn update(
        &self,
        user_id: i32,
        id: i32,
        update: DocumentUpdate,
    ) -> Result<documents::Model, DocumentError> {
        let existing = self
            .find(user_id, id)
            .await?
            .ok_or(DocumentError::NotFound(id))?;

        let mut active = existing.into_active_model();
        active.title = Set(update.title);
        active.content = Set(update.content);
        active.emoji = Set(update.emoji);
        active.updated_at = Set(Utc::now());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a document; a folder takes its children with it. Deleting a
    /// document the user does not own changes nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, user_id: i32, id: i32) -> Result<(), DbErr> {
        let result = documents::Entity::delete_many()
            .filter(documents::Column::Id.eq(id))
            .filter(documents::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
            info!(user_id, document_id = id, "Document deleted");
        }
        Ok(())
    }
}

fn ordered(query: Select<documents::Entity>, order: DocumentOrder) -> Select<documents::Entity> {
    match order {
        DocumentOrder::CreatedDesc => query.order_by_desc(documents::Column::CreatedAt),
        DocumentOrder::UpdatedDesc => query.order_by_desc(documents::Column::UpdatedAt),
    }
}
