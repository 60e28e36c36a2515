//! Book catalog service

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{book::DEFAULT_BOOK_AMOUNT, Book, BookDto, BookFields, BorrowedBooks},
    repository::BookStore,
};

#[derive(Clone)]
pub struct BooksService {
    store: Arc<dyn BookStore>,
}

impl BooksService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    /// Create a book, or add copies to the one with the same author and title
    pub async fn add_book(&self, book: BookDto) -> AppResult<BookDto> {
        let fields = BookFields::try_from(book)?;
        let amount = fields.amount.unwrap_or(DEFAULT_BOOK_AMOUNT);

        let book = self
            .store
            .add_copies(&fields.title, &fields.author, amount)
            .await?
            .ok_or_else(|| {
                AppError::Conflict(format!(
                    "Book '{}' by {} cannot hold {} more copies",
                    fields.title, fields.author, amount
                ))
            })?;

        tracing::info!(
            "Added {} copies of book id={}, {} on the shelf",
            amount,
            book.id,
            book.amount
        );
        Ok(book.into())
    }

    /// Get book by ID
    pub async fn get_book(&self, id: Uuid) -> AppResult<BookDto> {
        self.find_book(id).await.map(BookDto::from)
    }

    /// Replace title and author, and amount when one is given
    pub async fn update_book(&self, id: Uuid, book: BookDto) -> AppResult<BookDto> {
        let fields = BookFields::try_from(book)?;
        let existing = self.find_book(id).await?;

        if let Some(other) = self
            .store
            .find_by_author_and_title(&fields.author, &fields.title)
            .await?
        {
            if other.id != id {
                return Err(AppError::Conflict(format!(
                    "Book '{}' by {} already exists with id={}",
                    other.title, other.author, other.id
                )));
            }
        }

        let updated = self
            .store
            .update(Book {
                id,
                title: fields.title,
                author: fields.author,
                amount: fields.amount.unwrap_or(existing.amount),
            })
            .await?
            .ok_or_else(|| AppError::book_not_found(id))?;

        tracing::info!("Updated book id={}", id);
        Ok(updated.into())
    }

    /// Delete a book nobody is holding
    pub async fn delete_book(&self, id: Uuid) -> AppResult<()> {
        if self.store.is_borrowed(id).await? {
            tracing::debug!("Refusing to delete borrowed book id={}", id);
            return Err(AppError::Conflict(format!(
                "Book with id={} is borrowed and cannot be deleted",
                id
            )));
        }

        if self.store.delete(id).await? == 0 {
            return Err(AppError::book_not_found(id));
        }

        tracing::info!("Deleted book id={}", id);
        Ok(())
    }

    /// Books held by users with this name
    pub async fn books_borrowed_by_user(&self, user_name: &str) -> AppResult<BorrowedBooks> {
        let books = self.store.find_borrowed_by_user_name(user_name).await?;

        if books.is_empty() {
            return Err(AppError::NotFound(format!(
                "No books borrowed by user with name={}",
                user_name
            )));
        }

        Ok(BorrowedBooks {
            user_name: user_name.to_string(),
            books: books
                .into_iter()
                .map(|b| BookDto::from(b).without_amount())
                .collect(),
        })
    }

    /// Every borrowed book, with `amount` holding the number of borrowers
    pub async fn borrowed_books(&self) -> AppResult<Vec<BookDto>> {
        let books = self.store.find_borrowed_with_counts().await?;
        Ok(books.into_iter().map(BookDto::from).collect())
    }

    async fn find_book(&self, id: Uuid) -> AppResult<Book> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::book_not_found(id))
    }
}
