//! HTTP handlers for the catalog pages

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod genres;
pub mod health;
pub mod view;

use axum::{routing::get, Router};

pub use view::{Page, View};

use crate::{
    error::{AppError, AppResult},
    validation, AppState,
};

/// Parse the `:id` segment of a record URL; anything unparsable matches no record
pub(crate) fn record_id(raw: &str, entity: &str) -> AppResult<i32> {
    validation::parse_id(raw).ok_or_else(|| AppError::NotFound(format!("{} not found", entity)))
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(catalog::root))
        .route("/health", get(health::health_check))
        .route("/catalog", get(catalog::index))
        // Authors
        .route("/catalog/authors", get(authors::list_authors))
        .route(
            "/catalog/author/create",
            get(authors::create_author_form).post(authors::create_author),
        )
        .route("/catalog/author/:id", get(authors::author_detail))
        .route(
            "/catalog/author/:id/delete",
            get(authors::delete_author_form).post(authors::delete_author),
        )
        .route(
            "/catalog/author/:id/update",
            get(authors::update_author_form).post(authors::update_author),
        )
        // Books
        .route("/catalog/books", get(books::list_books))
        .route(
            "/catalog/book/create",
            get(books::create_book_form).post(books::create_book),
        )
        .route("/catalog/book/:id", get(books::book_detail))
        .route(
            "/catalog/book/:id/delete",
            get(books::delete_book_form).post(books::delete_book),
        )
        .route(
            "/catalog/book/:id/update",
            get(books::update_book_form).post(books::update_book),
        )
        // Genres
        .route("/catalog/genres", get(genres::list_genres))
        .route(
            "/catalog/genre/create",
            get(genres::create_genre_form).post(genres::create_genre),
        )
        .route("/catalog/genre/:id", get(genres::genre_detail))
        .route(
            "/catalog/genre/:id/delete",
            get(genres::delete_genre_form).post(genres::delete_genre),
        )
        .route(
            "/catalog/genre/:id/update",
            get(genres::update_genre_form).post(genres::update_genre),
        )
        // Book instances
        .route("/catalog/bookinstances", get(book_instances::list_book_instances))
        .route(
            "/catalog/bookinstance/create",
            get(book_instances::create_book_instance_form)
                .post(book_instances::create_book_instance),
        )
        .route(
            "/catalog/bookinstance/:id",
            get(book_instances::book_instance_detail),
        )
        .route(
            "/catalog/bookinstance/:id/delete",
            get(book_instances::delete_book_instance_form)
                .post(book_instances::delete_book_instance),
        )
        .route(
            "/catalog/bookinstance/:id/update",
            get(book_instances::update_book_instance_form)
                .post(book_instances::update_book_instance),
        )
        .with_state(state)
}
