//! Data models for BookList

pub mod author;
pub mod book;

// Re-export commonly used types
pub use author::{Author, AuthorDetail, AuthorInput, AuthorPayload};
pub use book::{Book, BookAuthor, BookCreated, BookInput, BookPayload, BookRow};
