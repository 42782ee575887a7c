//! Data models for the catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod enums;
pub mod genre;

use chrono::NaiveDate;

// Re-export commonly used types
pub use author::{Author, AuthorForm, NewAuthor};
pub use book::{Book, BookDetail, BookForm, BookWithAuthor, NewBook};
pub use book_instance::{BookInstance, BookInstanceForm, BookInstanceWithBook, NewBookInstance};
pub use enums::BookInstanceStatus;
pub use genre::{Genre, GenreForm};

/// Human readable date, empty when absent
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_default()
}
