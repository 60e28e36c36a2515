//! Business logic services

pub mod books;
pub mod users;

use std::sync::Arc;

use crate::{
    config::LibraryConfig,
    repository::{BookStore, HealthProbe, Repository, UserStore},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
    pub users: users::UsersService,
    pub health: Arc<dyn HealthProbe>,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, library_config: LibraryConfig) -> Self {
        Self::from_stores(
            Arc::new(repository.books.clone()),
            Arc::new(repository.users.clone()),
            Arc::new(repository),
            library_config,
        )
    }

    /// Wire services over arbitrary store implementations
    pub fn from_stores(
        books: Arc<dyn BookStore>,
        users: Arc<dyn UserStore>,
        health: Arc<dyn HealthProbe>,
        library_config: LibraryConfig,
    ) -> Self {
        Self {
            books: books::BooksService::new(books),
            users: users::UsersService::new(users, library_config),
            health,
        }
    }
}
