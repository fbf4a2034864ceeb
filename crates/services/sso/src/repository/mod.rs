//! Repository layer for data access.

mod app_repository;
pub mod entities;
mod user_repository;

pub use app_repository::{AppRepository, AppStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use app_repository::MockAppRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
