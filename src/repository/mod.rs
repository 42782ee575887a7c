//! Repository layer for database operations.
//!
//! Each entity is reached through a store trait so that services can be
//! exercised against mocks; the Postgres implementations live in the
//! per-entity submodules.

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        Author, Book, BookDetail, BookInstance, BookInstanceStatus, BookInstanceWithBook,
        BookWithAuthor, Genre, NewAuthor, NewBook, NewBookInstance,
    },
};

/// Result of a natural-key insert
#[derive(Debug, Clone, PartialEq)]
pub enum Inserted<T> {
    /// A new row was written
    Created(T),
    /// A row with the same natural key already existed and was left untouched
    Existing(T),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorStore: Send + Sync {
    /// All authors ordered by family name
    async fn list(&self) -> AppResult<Vec<Author>>;
    async fn get_by_id(&self, id: i32) -> AppResult<Option<Author>>;
    /// Insert unless an author with the same first and family name exists
    async fn insert_or_get(&self, author: &NewAuthor) -> AppResult<Inserted<Author>>;
    /// `None` when no author has this id
    async fn update(&self, id: i32, author: &NewAuthor) -> AppResult<Option<Author>>;
    /// `false` when no author has this id
    async fn delete(&self, id: i32) -> AppResult<bool>;
    async fn count(&self) -> AppResult<i64>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenreStore: Send + Sync {
    /// All genres ordered by name
    async fn list(&self) -> AppResult<Vec<Genre>>;
    async fn get_by_id(&self, id: i32) -> AppResult<Option<Genre>>;
    /// Insert unless a genre with the same name exists
    async fn insert_or_get(&self, name: &str) -> AppResult<Inserted<Genre>>;
    async fn update(&self, id: i32, name: &str) -> AppResult<Option<Genre>>;
    async fn delete(&self, id: i32) -> AppResult<bool>;
    async fn count(&self) -> AppResult<i64>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books ordered by title, with their author
    async fn list(&self) -> AppResult<Vec<BookWithAuthor>>;
    /// Book with its author and genres
    async fn get_by_id(&self, id: i32) -> AppResult<Option<BookDetail>>;
    async fn list_by_author(&self, author_id: i32) -> AppResult<Vec<Book>>;
    async fn list_by_genre(&self, genre_id: i32) -> AppResult<Vec<Book>>;
    async fn insert(&self, book: &NewBook) -> AppResult<Book>;
    async fn update(&self, id: i32, book: &NewBook) -> AppResult<Option<Book>>;
    async fn delete(&self, id: i32) -> AppResult<bool>;
    async fn count(&self) -> AppResult<i64>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookInstanceStore: Send + Sync {
    /// All copies with the title of their book
    async fn list(&self) -> AppResult<Vec<BookInstanceWithBook>>;
    async fn get_by_id(&self, id: i32) -> AppResult<Option<BookInstanceWithBook>>;
    async fn list_by_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>>;
    async fn insert(&self, instance: &NewBookInstance) -> AppResult<BookInstance>;
    async fn update(&self, id: i32, instance: &NewBookInstance) -> AppResult<Option<BookInstance>>;
    async fn delete(&self, id: i32) -> AppResult<bool>;
    async fn count(&self) -> AppResult<i64>;
    async fn count_by_status(&self, status: BookInstanceStatus) -> AppResult<i64>;
}

/// Main repository struct holding one store per entity
#[derive(Clone)]
pub struct Repository {
    pub authors: Arc<dyn AuthorStore>,
    pub genres: Arc<dyn GenreStore>,
    pub books: Arc<dyn BookStore>,
    pub book_instances: Arc<dyn BookInstanceStore>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: Arc::new(authors::AuthorsRepository::new(pool.clone())),
            genres: Arc::new(genres::GenresRepository::new(pool.clone())),
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            book_instances: Arc::new(book_instances::BookInstancesRepository::new(pool)),
        }
    }
}

/// Whether `err` is a unique constraint violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
