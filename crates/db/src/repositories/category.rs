//! Category repository for product category database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::categories;

/// Error types for category operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    /// Category name already exists.
    #[error("Category '{0}' already exists")]
    DuplicateName(String),

    /// Category not found.
    #[error("Category not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Category repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new category.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryError::DuplicateName`] if the name is taken.
    pub async fn create(
        &self,
        name: String,
        description: Option<String>,
    ) -> Result<categories::Model, CategoryError> {
        let existing = categories::Entity::find()
            .filter(categories::Column::Name.eq(&name))
            .count(&self.db)
            .await?;
        if existing > 0 {
            return Err(CategoryError::DuplicateName(name));
        }

        let now = Utc::now().into();
        let category = categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            description: Set(description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(category.insert(&self.db).await?)
    }

    /// Lists all categories ordered by name.
    pub async fn list(&self) -> Result<Vec<categories::Model>, CategoryError> {
        let categories = categories::Entity::find()
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await?;
        Ok(categories)
    }

    /// Gets a category by ID.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryError::NotFound`] if the category does not exist.
    pub async fn get(&self, id: Uuid) -> Result<categories::Model, CategoryError> {
        categories::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CategoryError::NotFound(id))
    }
}
