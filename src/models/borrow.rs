//! Lending rules evaluated before a book changes hands

use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// State read (under row locks) before a user borrows a book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorrowCheck {
    /// The user already holds a copy of this book
    pub already_borrowed: bool,
    pub user_exists: bool,
    /// Copies on the shelf, `None` when the book does not exist
    pub book_amount: Option<i32>,
    /// Distinct books the user currently holds
    pub borrowed_count: i64,
}

impl BorrowCheck {
    /// Apply the lending rules in order; the first failing rule wins.
    pub fn ensure_allowed(&self, user_id: Uuid, book_id: Uuid, max_books_per_user: i64) -> AppResult<()> {
        if self.already_borrowed {
            return Err(AppError::Conflict(format!(
                "User with id={} has already borrowed book with id={}",
                user_id, book_id
            )));
        }

        if !self.user_exists {
            return Err(AppError::user_not_found(user_id));
        }

        let amount = self.book_amount.ok_or_else(|| AppError::book_not_found(book_id))?;

        if self.borrowed_count >= max_books_per_user {
            return Err(AppError::Conflict(format!(
                "User with id={} cannot borrow more than {} books",
                user_id, max_books_per_user
            )));
        }

        if amount <= 0 {
            return Err(AppError::Conflict(format!(
                "No available copies of book with id={}",
                book_id
            )));
        }

        Ok(())
    }
}
