//! Book instance (copy) pages

use axum::extract::{Path, State};
use axum_extra::extract::{Form, WithRejection};

use crate::{
    error::{AppError, AppResult},
    models::{
        book_instance::{BookInstanceView, BookRef, BookRefView},
        BookInstanceForm, BookInstanceStatus, BookInstanceWithBook,
    },
    services::Submission,
    validation, AppState,
};

use super::{record_id, Page, View};

fn form_view(title: &str, books: Vec<BookRef>, selected_book: Option<i32>) -> View {
    let statuses: Vec<&str> = BookInstanceStatus::ALL.iter().map(|s| s.as_str()).collect();
    View::new("bookinstance_form", title)
        .with(
            "book_list",
            books.into_iter().map(BookRefView::from).collect::<Vec<_>>(),
        )
        .with("selected_book", selected_book)
        .with("statuses", statuses)
}

fn delete_view(instance: BookInstanceWithBook) -> View {
    View::new("bookinstance_delete", "Delete BookInstance")
        .with("bookinstance", BookInstanceView::from(instance))
}

/// Display list of all book copies
pub async fn list_book_instances(State(state): State<AppState>) -> AppResult<View> {
    let instances = state.services.book_instances.list().await?;
    Ok(View::new("bookinstance_list", "Book Instance List").with(
        "bookinstance_list",
        instances
            .into_iter()
            .map(BookInstanceView::from)
            .collect::<Vec<_>>(),
    ))
}

/// Display detail page for a specific copy
pub async fn book_instance_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<View> {
    let id = record_id(&id, "Book copy")?;
    let instance = state.services.book_instances.detail(id).await?;
    Ok(View::new("bookinstance_detail", format!("Copy: {}", id))
        .with("book_instance", BookInstanceView::from(instance)))
}

/// Display copy create form
pub async fn create_book_instance_form(State(state): State<AppState>) -> AppResult<View> {
    let books = state.services.book_instances.book_options().await?;
    Ok(form_view("Create BookInstance", books, None))
}

/// Handle copy create
pub async fn create_book_instance(
    State(state): State<AppState>,
    WithRejection(Form(form), _): WithRejection<Form<BookInstanceForm>, AppError>,
) -> AppResult<Page> {
    match state.services.book_instances.create(form).await? {
        Submission::Saved(instance) => Ok(Page::Redirect(instance.url())),
        Submission::Invalid {
            form: (form, books),
            errors,
        } => {
            let selected = form.book.parse().ok();
            Ok(form_view("Create BookInstance", books, selected)
                .with("bookinstance", form)
                .with_errors(errors)
                .into())
        }
    }
}

/// Display copy delete confirmation
pub async fn delete_book_instance_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Page> {
    let Some(id) = validation::parse_id(&id) else {
        return Ok(Page::Redirect("/catalog/bookinstances".to_string()));
    };
    match state.services.book_instances.find(id).await? {
        Some(instance) => Ok(delete_view(instance).into()),
        None => Ok(Page::Redirect("/catalog/bookinstances".to_string())),
    }
}

/// Handle copy delete
pub async fn delete_book_instance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Page> {
    if let Some(id) = validation::parse_id(&id) {
        state.services.book_instances.delete(id).await?;
    }
    Ok(Page::Redirect("/catalog/bookinstances".to_string()))
}

/// Display copy update form
pub async fn update_book_instance_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<View> {
    let id = record_id(&id, "Book copy")?;
    let (instance, books) = state.services.book_instances.edit(id).await?;
    let selected = Some(instance.book.id);
    Ok(form_view("Update BookInstance", books, selected)
        .with("bookinstance", BookInstanceView::from(instance)))
}

/// Handle copy update
pub async fn update_book_instance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Form(form), _): WithRejection<Form<BookInstanceForm>, AppError>,
) -> AppResult<Page> {
    let id = record_id(&id, "Book copy")?;
    match state.services.book_instances.update(id, form).await? {
        Submission::Saved(instance) => Ok(Page::Redirect(instance.url())),
        Submission::Invalid {
            form: (form, books),
            errors,
        } => {
            let selected = form.book.parse().ok();
            Ok(form_view("Update BookInstance", books, selected)
                .with("bookinstance", form)
                .with_errors(errors)
                .into())
        }
    }
}
