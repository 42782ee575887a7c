//! Book pages

use axum::extract::{Path, State};
use axum_extra::extract::{Form, WithRejection};

use crate::{
    error::{AppError, AppResult},
    models::{
        author::AuthorView,
        book::BookView,
        book_instance::BookInstanceView,
        BookForm, BookInstance,
    },
    services::{
        books::{BookFormOptions, BookPage},
        Deletion, Submission,
    },
    validation, AppState,
};

use super::{record_id, Page, View};

fn form_view(title: &str, options: BookFormOptions) -> View {
    View::new("book_form", title)
        .with(
            "authors",
            options
                .authors
                .into_iter()
                .map(AuthorView::from)
                .collect::<Vec<_>>(),
        )
        .with("genres", options.genres)
}

fn instances(instances: Vec<BookInstance>) -> Vec<BookInstanceView> {
    instances.into_iter().map(BookInstanceView::from).collect()
}

fn delete_view(page: BookPage) -> View {
    View::new("book_delete", "Delete Book")
        .with("book", BookView::from(page.book))
        .with("book_instances", instances(page.instances))
}

/// Display list of all books
pub async fn list_books(State(state): State<AppState>) -> AppResult<View> {
    let books = state.services.books.list().await?;
    Ok(View::new("book_list", "Book List").with(
        "book_list",
        books.into_iter().map(BookView::from).collect::<Vec<_>>(),
    ))
}

/// Display detail page for a specific book
pub async fn book_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<View> {
    let id = record_id(&id, "Book")?;
    let page = state.services.books.detail(id).await?;
    Ok(View::new("book_detail", page.book.book.title.clone())
        .with("book", BookView::from(page.book))
        .with("book_instances", instances(page.instances)))
}

/// Display book create form
pub async fn create_book_form(State(state): State<AppState>) -> AppResult<View> {
    let options = state.services.books.form_options(&[]).await?;
    Ok(form_view("Add Book", options))
}

/// Handle book create
pub async fn create_book(
    State(state): State<AppState>,
    WithRejection(Form(form), _): WithRejection<Form<BookForm>, AppError>,
) -> AppResult<Page> {
    match state.services.books.create(form).await? {
        Submission::Saved(book) => Ok(Page::Redirect(book.url())),
        Submission::Invalid {
            form: (form, options),
            errors,
        } => Ok(form_view("Add Book", options)
            .with("book", form)
            .with_errors(errors)
            .into()),
    }
}

/// Display book delete confirmation
pub async fn delete_book_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Page> {
    let Some(id) = validation::parse_id(&id) else {
        return Ok(Page::Redirect("/catalog/books".to_string()));
    };
    match state.services.books.find_with_instances(id).await? {
        Some(page) => Ok(delete_view(page).into()),
        None => Ok(Page::Redirect("/catalog/books".to_string())),
    }
}

/// Handle book delete
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Page> {
    let Some(id) = validation::parse_id(&id) else {
        return Ok(Page::Redirect("/catalog/books".to_string()));
    };
    match state.services.books.delete(id).await? {
        Deletion::Refused(page) => Ok(delete_view(page).into()),
        Deletion::Deleted | Deletion::Missing => Ok(Page::Redirect("/catalog/books".to_string())),
    }
}

/// Display book update form
pub async fn update_book_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<View> {
    let id = record_id(&id, "Book")?;
    let (book, options) = state.services.books.edit(id).await?;
    Ok(form_view("Update Book", options).with("book", BookView::from(book)))
}

/// Handle book update
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Form(form), _): WithRejection<Form<BookForm>, AppError>,
) -> AppResult<Page> {
    let id = record_id(&id, "Book")?;
    match state.services.books.update(id, form).await? {
        Submission::Saved(book) => Ok(Page::Redirect(book.url())),
        Submission::Invalid {
            form: (form, options),
            errors,
        } => Ok(form_view("Update Book", options)
            .with("book", form)
            .with_errors(errors)
            .into()),
    }
}
