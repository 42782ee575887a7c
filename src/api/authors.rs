//! Author pages

use axum::extract::{Path, State};
use axum_extra::extract::{Form, WithRejection};

use crate::{
    error::{AppError, AppResult},
    models::{author::AuthorView, book::BookView, AuthorForm},
    services::{authors::AuthorDetail, Deletion, Submission},
    validation, AppState,
};

use super::{record_id, Page, View};

fn delete_view(detail: AuthorDetail) -> View {
    View::new("author_delete", "Delete Author")
        .with("author", AuthorView::from(detail.author))
        .with(
            "author_books",
            detail.books.into_iter().map(BookView::from).collect::<Vec<_>>(),
        )
}

/// Display list of all authors
pub async fn list_authors(State(state): State<AppState>) -> AppResult<View> {
    let authors = state.services.authors.list().await?;
    Ok(View::new("author_list", "Author List").with(
        "author_list",
        authors.into_iter().map(AuthorView::from).collect::<Vec<_>>(),
    ))
}

/// Display detail page for a specific author
pub async fn author_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<View> {
    let id = record_id(&id, "Author")?;
    let detail = state.services.authors.detail(id).await?;
    let author = AuthorView::from(detail.author);
    Ok(View::new("author_detail", author.name.clone())
        .with("author", author)
        .with(
            "books",
            detail.books.into_iter().map(BookView::from).collect::<Vec<_>>(),
        ))
}

/// Display author create form
pub async fn create_author_form() -> View {
    View::new("author_form", "Add Author")
}

/// Handle author create
pub async fn create_author(
    State(state): State<AppState>,
    WithRejection(Form(form), _): WithRejection<Form<AuthorForm>, AppError>,
) -> AppResult<Page> {
    match state.services.authors.create(form).await? {
        Submission::Saved(author) => Ok(Page::Redirect(author.url())),
        Submission::Invalid { form, errors } => Ok(View::new("author_form", "Add Author")
            .with("author", form)
            .with_errors(errors)
            .into()),
    }
}

/// Display author delete confirmation
pub async fn delete_author_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Page> {
    let Some(id) = validation::parse_id(&id) else {
        return Ok(Page::Redirect("/catalog/authors".to_string()));
    };
    match state.services.authors.find_with_books(id).await? {
        Some(detail) => Ok(delete_view(detail).into()),
        None => Ok(Page::Redirect("/catalog/authors".to_string())),
    }
}

/// Handle author delete
pub async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Page> {
    let Some(id) = validation::parse_id(&id) else {
        return Ok(Page::Redirect("/catalog/authors".to_string()));
    };
    match state.services.authors.delete(id).await? {
        Deletion::Refused(detail) => Ok(delete_view(detail).into()),
        Deletion::Deleted | Deletion::Missing => Ok(Page::Redirect("/catalog/authors".to_string())),
    }
}

/// Display author update form
pub async fn update_author_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<View> {
    let id = record_id(&id, "Author")?;
    let author = state.services.authors.get(id).await?;
    Ok(View::new("author_form", "Update Author").with("author", AuthorView::from(author)))
}

/// Handle author update
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Form(form), _): WithRejection<Form<AuthorForm>, AppError>,
) -> AppResult<Page> {
    let id = record_id(&id, "Author")?;
    match state.services.authors.update(id, form).await? {
        Submission::Saved(author) => Ok(Page::Redirect(author.url())),
        Submission::Invalid { form, errors } => Ok(View::new("author_form", "Update Author")
            .with("author", form)
            .with_errors(errors)
            .into()),
    }
}
