//! Users repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{books::BooksRepository, is_violation, UserStore, FOREIGN_KEY_VIOLATION, UNIQUE_VIOLATION};
use crate::{
    error::{AppError, AppResult},
    models::{BorrowCheck, User},
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UsersRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT id, name, membership_date FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create(&self, user: User) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, membership_date)
            VALUES ($1, $2, $3)
            RETURNING id, name, membership_date
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(user.membership_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn update_name(&self, id: Uuid, name: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET name = $2 WHERE id = $1 RETURNING id, name, membership_date",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_violation(&e, FOREIGN_KEY_VIOLATION) {
                    AppError::Conflict(format!("User with id={} has borrowed books", id))
                } else {
                    e.into()
                }
            })?;
        Ok(result.rows_affected())
    }

    async fn count_borrowed_books(&self, id: Uuid) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users_books WHERE user_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn borrow_book(&self, user_id: Uuid, book_id: Uuid, max_books_per_user: i64) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        // Lock order is user then book, same as return_book
        let user_exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .is_some();

        let book_amount: Option<i32> =
            sqlx::query_scalar("SELECT amount FROM books WHERE id = $1 FOR UPDATE")
                .bind(book_id)
                .fetch_optional(&mut *tx)
                .await?;

        let already_borrowed: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users_books WHERE user_id = $1 AND book_id = $2)",
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await?;

        let borrowed_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users_books WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        BorrowCheck {
            already_borrowed,
            user_exists,
            book_amount,
            borrowed_count,
        }
        .ensure_allowed(user_id, book_id, max_books_per_user)?;

        sqlx::query("INSERT INTO users_books (id, user_id, book_id) VALUES ($1, $2, $3)")
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(book_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_violation(&e, UNIQUE_VIOLATION) {
                    AppError::Conflict(format!(
                        "User with id={} has already borrowed book with id={}",
                        user_id, book_id
                    ))
                } else {
                    e.into()
                }
            })?;

        BooksRepository::decrease_amount_by_one(&mut tx, book_id).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn return_book(&self, user_id: Uuid, book_id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let removed = sqlx::query("DELETE FROM users_books WHERE user_id = $1 AND book_id = $2")
            .bind(user_id)
            .bind(book_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            return Err(AppError::NotFound(format!(
                "User with id={} has not borrowed book with id={}",
                user_id, book_id
            )));
        }

        BooksRepository::increase_amount_by_one(&mut tx, book_id).await?;

        tx.commit().await?;
        Ok(())
    }
}
