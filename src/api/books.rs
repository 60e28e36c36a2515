//! Book catalog endpoints

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::{
    error::{AppResult, ErrorResponse},
    models::{BookDto, BorrowedBooks},
};

use super::{ApiJson, ApiPath};

/// Add a book, or more copies of a book already in the catalog
#[utoipa::path(
    post,
    path = "/v1/books",
    tag = "books",
    request_body = BookDto,
    responses(
        (status = 200, description = "Created book, or existing book with its increased amount", body = BookDto),
        (status = 400, description = "Invalid title, author or amount", body = ErrorResponse)
    )
)]
pub async fn add_book(
    State(state): State<crate::AppState>,
    ApiJson(book): ApiJson<BookDto>,
) -> AppResult<Json<BookDto>> {
    let added = state.services.books.add_book(book).await?;
    Ok(Json(added))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/v1/books/{bookId}",
    tag = "books",
    params(
        ("bookId" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDto),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    ApiPath(book_id): ApiPath<Uuid>,
) -> AppResult<Json<BookDto>> {
    let book = state.services.books.get_book(book_id).await?;
    Ok(Json(book))
}

/// Update an existing book
#[utoipa::path(
    put,
    path = "/v1/books/{bookId}",
    tag = "books",
    params(
        ("bookId" = Uuid, Path, description = "Book ID")
    ),
    request_body = BookDto,
    responses(
        (status = 200, description = "Book updated", body = BookDto),
        (status = 400, description = "Invalid title, author or amount", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse),
        (status = 409, description = "Another book has the same author and title", body = ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    ApiPath(book_id): ApiPath<Uuid>,
    ApiJson(book): ApiJson<BookDto>,
) -> AppResult<Json<BookDto>> {
    let updated = state.services.books.update_book(book_id, book).await?;
    Ok(Json(updated))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/v1/books/{bookId}",
    tag = "books",
    params(
        ("bookId" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = ErrorResponse),
        (status = 409, description = "Book is borrowed", body = ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    ApiPath(book_id): ApiPath<Uuid>,
) -> AppResult<StatusCode> {
    state.services.books.delete_book(book_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List borrowed books with their number of borrowers in `amount`
#[utoipa::path(
    get,
    path = "/v1/books/borrowed",
    tag = "books",
    responses(
        (status = 200, description = "Borrowed books", body = Vec<BookDto>)
    )
)]
pub async fn borrowed_books(State(state): State<crate::AppState>) -> AppResult<Json<Vec<BookDto>>> {
    let books = state.services.books.borrowed_books().await?;
    Ok(Json(books))
}

/// List the books borrowed by users with the given name
#[utoipa::path(
    get,
    path = "/v1/users/{userName}/books",
    tag = "books",
    params(
        ("userName" = String, Path, description = "User name, e.g. `John Doe`")
    ),
    responses(
        (status = 200, description = "Borrowed books", body = BorrowedBooks),
        (status = 404, description = "No books borrowed under this name", body = ErrorResponse)
    )
)]
pub async fn books_borrowed_by_user(
    State(state): State<crate::AppState>,
    ApiPath(user_name): ApiPath<String>,
) -> AppResult<Json<BorrowedBooks>> {
    let borrowed = state.services.books.books_borrowed_by_user(&user_name).await?;
    Ok(Json(borrowed))
}
