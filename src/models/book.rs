//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{validate_book_title, validate_person_name};

/// Copies added when a request does not carry an amount
pub const DEFAULT_BOOK_AMOUNT: i32 = 1;

/// Book row from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    /// Copies currently on the shelf
    pub amount: i32,
}

/// Book as exchanged over the API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    /// Ignored on input; the server assigns identifiers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[validate(
        required(message = "The book title is required"),
        custom(function = "validate_book_title")
    )]
    #[schema(example = "Clean Code")]
    pub title: Option<String>,
    #[validate(
        required(message = "The author name is required"),
        custom(function = "validate_person_name")
    )]
    #[schema(example = "Robert Martin")]
    pub author: Option<String>,
    #[validate(range(min = 1, message = "The amount must be greater than 0"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i32>,
}

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        Self {
            id: Some(book.id),
            title: Some(book.title),
            author: Some(book.author),
            amount: Some(book.amount),
        }
    }
}

impl BookDto {
    /// Same book without the shelf counter, as listed for a borrower
    pub fn without_amount(mut self) -> Self {
        self.amount = None;
        self
    }
}

/// Validated book fields used for writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub amount: Option<i32>,
}

impl TryFrom<BookDto> for BookFields {
    type Error = validator::ValidationErrors;

    fn try_from(dto: BookDto) -> Result<Self, Self::Error> {
        dto.validate()?;
        Ok(Self {
            // Both are `required` above, so validation has already rejected `None`
            title: dto.title.unwrap_or_default(),
            author: dto.author.unwrap_or_default(),
            amount: dto.amount,
        })
    }
}

/// Books currently held by users with a given name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowedBooks {
    pub user_name: String,
    pub books: Vec<BookDto>,
}
