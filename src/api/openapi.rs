//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library Server API",
        version = "0.1.0",
        description = "Book lending REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::add_book,
        books::get_book,
        books::update_book,
        books::delete_book,
        books::borrowed_books,
        books::books_borrowed_by_user,
        // Users
        users::create_user,
        users::get_user,
        users::update_user,
        users::delete_user,
        users::borrow_book,
        users::return_book,
    ),
    components(
        schemas(
            crate::models::book::BookDto,
            crate::models::book::BorrowedBooks,
            crate::models::user::UserDto,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog"),
        (name = "users", description = "Users and lending")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
