//! Repository layer for database operations
//!
//! Services talk to the database through the [`BookStore`], [`UserStore`] and
//! [`HealthProbe`] traits; [`Repository`] bundles their PostgreSQL implementations.

pub mod books;
pub mod users;

use async_trait::async_trait;
use sqlx::{Executor, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Book, User},
};

const FOREIGN_KEY_VIOLATION: &str = "23503";
const UNIQUE_VIOLATION: &str = "23505";
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

/// Persistence of books and of the borrow counters they carry
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>>;

    async fn find_by_author_and_title(&self, author: &str, title: &str) -> AppResult<Option<Book>>;

    /// Create the book, or add `amount` copies when the author and title are already known.
    /// Returns `None` when the existing book cannot hold that many more copies.
    async fn add_copies(&self, title: &str, author: &str, amount: i32) -> AppResult<Option<Book>>;

    /// Returns `None` when no book has this id
    async fn update(&self, book: Book) -> AppResult<Option<Book>>;

    /// Returns the number of deleted rows
    async fn delete(&self, id: Uuid) -> AppResult<u64>;

    /// True when at least one user holds this book
    async fn is_borrowed(&self, id: Uuid) -> AppResult<bool>;

    async fn find_borrowed_by_user_name(&self, user_name: &str) -> AppResult<Vec<Book>>;

    /// Every borrowed book, with `amount` set to the number of borrowers
    async fn find_borrowed_with_counts(&self) -> AppResult<Vec<Book>>;
}

/// Persistence of users and of the user/book borrow relation
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn create(&self, user: User) -> AppResult<User>;

    /// Returns `None` when no user has this id
    async fn update_name(&self, id: Uuid, name: &str) -> AppResult<Option<User>>;

    async fn delete(&self, id: Uuid) -> AppResult<u64>;

    async fn count_borrowed_books(&self, id: Uuid) -> AppResult<i64>;

    /// Check the lending rules and record the loan in one transaction
    async fn borrow_book(&self, user_id: Uuid, book_id: Uuid, max_books_per_user: i64) -> AppResult<()>;

    /// Remove the loan and put the copy back on the shelf in one transaction
    async fn return_book(&self, user_id: Uuid, book_id: Uuid) -> AppResult<()>;
}

/// Database reachability, used by the readiness endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> AppResult<()>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }

    /// Load the development data set. Every insert is idempotent.
    pub async fn seed_test_data(&self) -> AppResult<()> {
        self.pool
            .execute(include_str!("../../seeds/test_data.sql"))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl HealthProbe for Repository {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// True when `err` is a PostgreSQL error with the given SQLSTATE
fn is_violation(err: &sqlx::Error, code: &str) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(code),
        _ => false,
    }
}
