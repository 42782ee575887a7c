//! Genre pages

use axum::extract::{Path, State};
use axum_extra::extract::{Form, WithRejection};

use crate::{
    error::{AppError, AppResult},
    models::{book::BookView, genre::GenreView, Book, GenreForm},
    services::{genres::GenreDetail, Deletion, Submission},
    validation, AppState,
};

use super::{record_id, Page, View};

fn books(books: Vec<Book>) -> Vec<BookView> {
    books.into_iter().map(BookView::from).collect()
}

fn delete_view(detail: GenreDetail) -> View {
    View::new("genre_delete", "Delete Genre")
        .with("genre", GenreView::from(detail.genre))
        .with("genre_books", books(detail.books))
}

/// Display list of all genres
pub async fn list_genres(State(state): State<AppState>) -> AppResult<View> {
    let genres = state.services.genres.list().await?;
    Ok(View::new("genre_list", "Genre List").with(
        "genre_list",
        genres.into_iter().map(GenreView::from).collect::<Vec<_>>(),
    ))
}

/// Display detail page for a specific genre
pub async fn genre_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<View> {
    let id = record_id(&id, "Genre")?;
    let detail = state.services.genres.detail(id).await?;
    Ok(View::new("genre_detail", "Genre Details")
        .with("genre", GenreView::from(detail.genre))
        .with("genre_books", books(detail.books)))
}

/// Display genre create form
pub async fn create_genre_form() -> View {
    View::new("genre_form", "Create Genre")
}

/// Handle genre create
pub async fn create_genre(
    State(state): State<AppState>,
    WithRejection(Form(form), _): WithRejection<Form<GenreForm>, AppError>,
) -> AppResult<Page> {
    match state.services.genres.create(form).await? {
        Submission::Saved(genre) => Ok(Page::Redirect(genre.url())),
        Submission::Invalid { form, errors } => Ok(View::new("genre_form", "Create Genre")
            .with("genre", form)
            .with_errors(errors)
            .into()),
    }
}

/// Display genre delete confirmation
pub async fn delete_genre_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Page> {
    let Some(id) = validation::parse_id(&id) else {
        return Ok(Page::Redirect("/catalog/genres".to_string()));
    };
    match state.services.genres.find_with_books(id).await? {
        Some(detail) => Ok(delete_view(detail).into()),
        None => Ok(Page::Redirect("/catalog/genres".to_string())),
    }
}

/// Handle genre delete
pub async fn delete_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Page> {
    let Some(id) = validation::parse_id(&id) else {
        return Ok(Page::Redirect("/catalog/genres".to_string()));
    };
    match state.services.genres.delete(id).await? {
        Deletion::Refused(detail) => Ok(delete_view(detail).into()),
        Deletion::Deleted | Deletion::Missing => Ok(Page::Redirect("/catalog/genres".to_string())),
    }
}

/// Display genre update form
pub async fn update_genre_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<View> {
    let id = record_id(&id, "Genre")?;
    let genre = state.services.genres.get(id).await?;
    Ok(View::new("genre_form", "Update Genre").with("genre", GenreView::from(genre)))
}

/// Handle genre update
pub async fn update_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Form(form), _): WithRejection<Form<GenreForm>, AppError>,
) -> AppResult<Page> {
    let id = record_id(&id, "Genre")?;
    match state.services.genres.update(id, form).await? {
        Submission::Saved(genre) => Ok(Page::Redirect(genre.url())),
        Submission::Invalid { form, errors } => Ok(View::new("genre_form", "Update Genre")
            .with("genre", form)
            .with_errors(errors)
            .into()),
    }
}
