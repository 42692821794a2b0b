//! Project repository for project database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::projects;

/// Error types for project operations.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// Project not found.
    #[error("Project not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Project repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    db: DatabaseConnection,
}

impl ProjectRepository {
    /// Creates a new project repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new project.
    pub async fn create(
        &self,
        name: String,
        description: Option<String>,
    ) -> Result<projects::Model, ProjectError> {
        let now = Utc::now().into();
        let project = projects::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            description: Set(description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(project.insert(&self.db).await?)
    }

    /// Lists all projects, newest first.
    pub async fn list(&self) -> Result<Vec<projects::Model>, ProjectError> {
        let projects = projects::Entity::find()
            .order_by_desc(projects::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(projects)
    }

    /// Gets a project by ID.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::NotFound`] if the project does not exist.
    pub async fn get(&self, id: Uuid) -> Result<projects::Model, ProjectError> {
        projects::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ProjectError::NotFound(id))
    }
}
