//! API handlers for the library REST endpoints

pub mod books;
pub mod health;
pub mod openapi;
pub mod users;

use axum::{
    extract::{FromRequest, FromRequestParts},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, AppState};

/// JSON body extractor whose rejections use the application error body
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path extractor whose rejections use the application error body
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // The `:user` segment is a user id everywhere except `/users/:user/books`,
    // where it is a user name
    let api_v1 = Router::new()
        // Books
        .route("/books", post(books::add_book))
        .route("/books/borrowed", get(books::borrowed_books))
        .route(
            "/books/:book_id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        // Users
        .route("/users", post(users::create_user))
        .route(
            "/users/:user",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/:user/books", get(books::books_borrowed_by_user))
        .route(
            "/users/:user/books/:book_id",
            put(users::borrow_book).delete(users::return_book),
        );

    let app = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/v1", api_v1)
        .with_state(state);

    app.merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
