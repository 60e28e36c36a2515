//! User management and lending endpoints

use axum::{
    extract::State,
    http::{header::LOCATION, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult, ErrorResponse},
    models::UserDto,
};

use super::{ApiJson, ApiPath};

/// Get user details by ID
#[utoipa::path(
    get,
    path = "/v1/users/{userId}",
    tag = "users",
    params(
        ("userId" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = UserDto),
        (status = 404, description = "User not found", body = ErrorResponse,
            example = json!({
                "timestamp": "2024-08-13T15:26:57.322006719Z",
                "errorCode": 404,
                "details": "User with id=5ac00873-2948-436d-9da0-1fb450fe241b not found"
            }))
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> AppResult<Json<UserDto>> {
    let user = state.services.users.get_user(user_id).await?;
    Ok(Json(user))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/v1/users",
    tag = "users",
    request_body = UserDto,
    responses(
        (status = 201, description = "User created; `Location` points at the new user", body = UserDto),
        (status = 400, description = "Invalid name", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    ApiJson(user): ApiJson<UserDto>,
) -> AppResult<impl IntoResponse> {
    let created = state.services.users.create_user(user).await?;
    let id = created
        .id
        .ok_or_else(|| AppError::Internal("Created user has no id".to_string()))?;

    Ok((
        StatusCode::CREATED,
        [(LOCATION, format!("/v1/users/{}", id))],
        Json(created),
    ))
}

/// Update an existing user
#[utoipa::path(
    put,
    path = "/v1/users/{userId}",
    tag = "users",
    params(
        ("userId" = Uuid, Path, description = "User ID")
    ),
    request_body = UserDto,
    responses(
        (status = 200, description = "User updated", body = UserDto),
        (status = 400, description = "Invalid name", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<crate::AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
    ApiJson(user): ApiJson<UserDto>,
) -> AppResult<Json<UserDto>> {
    let updated = state.services.users.update_user(user_id, user).await?;
    Ok(Json(updated))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/v1/users/{userId}",
    tag = "users",
    params(
        ("userId" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "User has borrowed books", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<crate::AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> AppResult<StatusCode> {
    state.services.users.delete_user(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Borrow a book
#[utoipa::path(
    put,
    path = "/v1/users/{userId}/books/{bookId}",
    tag = "users",
    params(
        ("userId" = Uuid, Path, description = "User ID"),
        ("bookId" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book borrowed"),
        (status = 404, description = "User or book not found", body = ErrorResponse),
        (status = 409, description = "Already borrowed, borrow limit reached or no copies left", body = ErrorResponse)
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    ApiPath((user_id, book_id)): ApiPath<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    state.services.users.borrow_book(user_id, book_id).await?;
    Ok(StatusCode::OK)
}

/// Return a borrowed book
#[utoipa::path(
    delete,
    path = "/v1/users/{userId}/books/{bookId}",
    tag = "users",
    params(
        ("userId" = Uuid, Path, description = "User ID"),
        ("bookId" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book returned"),
        (status = 404, description = "The user has not borrowed this book", body = ErrorResponse)
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    ApiPath((user_id, book_id)): ApiPath<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    state.services.users.return_book(user_id, book_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
