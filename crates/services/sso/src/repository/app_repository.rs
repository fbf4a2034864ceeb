//! Application repository implementation.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, NotSet, Set, SqlErr};
use tracing::debug;

use super::entities::app::{ActiveModel, Entity as AppEntity};
use common::{AppError, AppResult};
use domain::App;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Application lookups needed by the auth flow. Applications are read-only
/// here; provisioning goes through [`AppStore::create`].
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AppRepository: Send + Sync {
    /// Find application by ID
    async fn find_by_id(&self, id: i32) -> AppResult<Option<App>>;
}

/// SeaORM-backed application repository
pub struct AppStore {
    db: DatabaseConnection,
}

impl AppStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Register a new application and return its ID. Operator use only.
    pub async fn create(&self, name: String, secret: String) -> AppResult<i32> {
        App::validate_new(&name, &secret)?;

        let active_model = ActiveModel {
            id: NotSet,
            name: Set(name.clone()),
            secret: Set(secret),
        };

        let result = AppEntity::insert(active_model)
            .exec(&self.db)
            .await
            .map_err(|err| match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    AppError::internal(format!("app '{}' already exists", name))
                }
                _ => AppError::from(err),
            })?;

        Ok(result.last_insert_id)
    }
}

#[async_trait]
impl AppRepository for AppStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<App>> {
        debug!(app_id = id, "Looking up app");
        let result = AppEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(App::from))
    }
}
