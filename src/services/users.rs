//! Library member service

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    config::LibraryConfig,
    error::{AppError, AppResult},
    models::{User, UserDto},
    repository::UserStore,
};

#[derive(Clone)]
pub struct UsersService {
    store: Arc<dyn UserStore>,
    config: LibraryConfig,
}

impl UsersService {
    pub fn new(store: Arc<dyn UserStore>, config: LibraryConfig) -> Self {
        Self { store, config }
    }

    /// Register a member; the membership starts today
    pub async fn create_user(&self, user: UserDto) -> AppResult<UserDto> {
        let name = user.into_name()?;

        let created = self
            .store
            .create(User {
                id: Uuid::new_v4(),
                name,
                membership_date: Utc::now().date_naive(),
            })
            .await?;

        tracing::info!("Created user id={}", created.id);
        Ok(created.into())
    }

    /// Get user by ID
    pub async fn get_user(&self, id: Uuid) -> AppResult<UserDto> {
        self.find_user(id).await.map(UserDto::from)
    }

    /// Rename a member. The membership date never changes.
    pub async fn update_user(&self, id: Uuid, user: UserDto) -> AppResult<UserDto> {
        let name = user.into_name()?;

        let updated = self
            .store
            .update_name(id, &name)
            .await?
            .ok_or_else(|| AppError::user_not_found(id))?;

        tracing::info!("Updated user id={}", id);
        Ok(updated.into())
    }

    /// Delete a member who holds no books
    pub async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        self.find_user(id).await?;

        let borrowed = self.store.count_borrowed_books(id).await?;
        if borrowed > 0 {
            tracing::debug!("Refusing to delete user id={} holding {} books", id, borrowed);
            return Err(AppError::Conflict(format!(
                "User with id={} has {} borrowed books and cannot be deleted",
                id, borrowed
            )));
        }

        if self.store.delete(id).await? == 0 {
            return Err(AppError::user_not_found(id));
        }

        tracing::info!("Deleted user id={}", id);
        Ok(())
    }

    /// Lend one copy of a book to a member
    pub async fn borrow_book(&self, user_id: Uuid, book_id: Uuid) -> AppResult<()> {
        self.store
            .borrow_book(user_id, book_id, self.config.max_books_per_user)
            .await?;

        tracing::info!("User id={} borrowed book id={}", user_id, book_id);
        Ok(())
    }

    /// Take a lent copy back
    pub async fn return_book(&self, user_id: Uuid, book_id: Uuid) -> AppResult<()> {
        self.store.return_book(user_id, book_id).await?;

        tracing::info!("User id={} returned book id={}", user_id, book_id);
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> AppResult<User> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::user_not_found(id))
    }
}
