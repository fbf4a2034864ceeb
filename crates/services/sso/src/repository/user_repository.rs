//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, QueryFilter,
    Set, SqlErr,
};
use tracing::debug;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use common::{AppError, AppResult};
use domain::User;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find user by ID
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Insert a new non-admin user and return its ID.
    ///
    /// Fails with `UserAlreadyExists` when the email is taken. Uniqueness is
    /// enforced by the store at insert time, so concurrent inserts of one
    /// email produce exactly one row.
    async fn insert(&self, email: String, password_hash: String) -> AppResult<i64>;
}

/// SeaORM-backed user repository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Set or clear a user's admin flag. Operator use only.
    pub async fn set_admin(&self, id: i64, is_admin: bool) -> AppResult<User> {
        let user = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let mut active: ActiveModel = user.into();
        active.is_admin = Set(is_admin);

        let model = active.update(&self.db).await?;
        Ok(User::from(model))
    }

    /// Number of users registered under an email. Used by consistency checks.
    pub async fn count_by_email(&self, email: &str) -> AppResult<u64> {
        use sea_orm::PaginatorTrait;

        let count = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.db)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        debug!("Looking up user by email");
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        debug!(user_id = id, "Looking up user by id");
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn insert(&self, email: String, password_hash: String) -> AppResult<i64> {
        let active_model = ActiveModel {
            id: NotSet,
            email: Set(email),
            password_hash: Set(password_hash),
            is_admin: Set(false),
            created_at: Set(chrono::Utc::now()),
        };

        let result = UserEntity::insert(active_model)
            .exec(&self.db)
            .await
            .map_err(map_insert_error)?;

        debug!(user_id = result.last_insert_id, "Inserted user");
        Ok(result.last_insert_id)
    }
}

fn map_insert_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::UserAlreadyExists,
        _ => AppError::from(err),
    }
}
