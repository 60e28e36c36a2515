//! Books repository for database operations

use async_trait::async_trait;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use super::{
    is_violation, BookStore, FOREIGN_KEY_VIOLATION, NUMERIC_VALUE_OUT_OF_RANGE, UNIQUE_VIOLATION,
};
use crate::{
    error::{AppError, AppResult},
    models::Book,
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Take one copy off the shelf. Runs on the caller's transaction.
    pub async fn decrease_amount_by_one(conn: &mut PgConnection, id: Uuid) -> AppResult<()> {
        let updated = sqlx::query("UPDATE books SET amount = amount - 1 WHERE id = $1 AND amount > 0")
            .bind(id)
            .execute(&mut *conn)
            .await?
            .rows_affected();

        if updated == 0 {
            return Err(AppError::Conflict(format!(
                "No available copies of book with id={}",
                id
            )));
        }
        Ok(())
    }

    /// Put one copy back on the shelf. Runs on the caller's transaction.
    pub async fn increase_amount_by_one(conn: &mut PgConnection, id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE books SET amount = amount + 1 WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                if is_violation(&e, NUMERIC_VALUE_OUT_OF_RANGE) {
                    AppError::Conflict(format!("Book with id={} cannot hold more copies", id))
                } else {
                    e.into()
                }
            })?;
        Ok(())
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT id, title, author, amount FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn find_by_author_and_title(&self, author: &str, title: &str) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, amount FROM books WHERE author = $1 AND title = $2",
        )
        .bind(author)
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }

    async fn add_copies(&self, title: &str, author: &str, amount: i32) -> AppResult<Option<Book>> {
        // The guard skips the update, and so the returned row, when the sum would overflow INTEGER
        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (id, title, author, amount)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (author, title)
            DO UPDATE SET amount = books.amount + EXCLUDED.amount
            WHERE books.amount <= 2147483647 - EXCLUDED.amount
            RETURNING id, title, author, amount
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(author)
        .bind(amount)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }

    async fn update(&self, book: Book) -> AppResult<Option<Book>> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET title = $2, author = $3, amount = $4
            WHERE id = $1
            RETURNING id, title, author, amount
            "#,
        )
        .bind(book.id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.amount)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_violation(&e, UNIQUE_VIOLATION) {
                AppError::Conflict(format!(
                    "Book '{}' by {} already exists",
                    book.title, book.author
                ))
            } else {
                e.into()
            }
        })
    }

    async fn delete(&self, id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                // A loan recorded between the service check and this delete
                if is_violation(&e, FOREIGN_KEY_VIOLATION) {
                    AppError::Conflict(format!("Book with id={} is borrowed", id))
                } else {
                    e.into()
                }
            })?;
        Ok(result.rows_affected())
    }

    async fn is_borrowed(&self, id: Uuid) -> AppResult<bool> {
        let borrowed: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users_books WHERE book_id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(borrowed)
    }

    async fn find_borrowed_by_user_name(&self, user_name: &str) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT DISTINCT b.id, b.title, b.author, b.amount
            FROM books b
            JOIN users_books ub ON ub.book_id = b.id
            JOIN users u ON u.id = ub.user_id
            WHERE u.name = $1
            ORDER BY b.title, b.author
            "#,
        )
        .bind(user_name)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    async fn find_borrowed_with_counts(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT b.id, b.title, b.author, CAST(COUNT(ub.id) AS INTEGER) AS amount
            FROM books b
            JOIN users_books ub ON ub.book_id = b.id
            GROUP BY b.id, b.title, b.author
            ORDER BY b.title, b.author
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }
}
