//! Data models for the library

pub mod book;
pub mod borrow;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookDto, BookFields, BorrowedBooks};
pub use borrow::BorrowCheck;
pub use user::{User, UserDto};
