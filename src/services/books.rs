//! Book catalog service

use crate::{
    error::{AppError, AppResult},
    models::{
        genre::{mark_checked, GenreOption},
        Author, Book, BookDetail, BookForm, BookInstance, BookWithAuthor, NewBook,
    },
    repository::Repository,
    validation::FormError,
};

use super::{Deletion, Submission};

/// Book with its author, genres and copies
#[derive(Debug, Clone)]
pub struct BookPage {
    pub book: BookDetail,
    pub instances: Vec<BookInstance>,
}

/// Selection lists shown on the book form
#[derive(Debug, Clone)]
pub struct BookFormOptions {
    pub authors: Vec<Author>,
    pub genres: Vec<GenreOption>,
}

/// Book form re-shown after a rejected submission
pub type BookFormRetry = (BookForm, BookFormOptions);

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All books ordered by title, with their author
    pub async fn list(&self) -> AppResult<Vec<BookWithAuthor>> {
        self.repository.books.list().await
    }

    pub async fn find_with_instances(&self, id: i32) -> AppResult<Option<BookPage>> {
        let (book, instances) = tokio::try_join!(
            self.repository.books.get_by_id(id),
            self.repository.book_instances.list_by_book(id),
        )?;
        Ok(book.map(|book| BookPage { book, instances }))
    }

    pub async fn detail(&self, id: i32) -> AppResult<BookPage> {
        self.find_with_instances(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    /// Authors and genres for the form, with `selected` genres ticked
    pub async fn form_options(&self, selected: &[i32]) -> AppResult<BookFormOptions> {
        let (authors, genres) = tokio::try_join!(
            self.repository.authors.list(),
            self.repository.genres.list(),
        )?;
        Ok(BookFormOptions {
            authors,
            genres: mark_checked(genres, selected),
        })
    }

    /// Existing book plus the form options, for the update form
    pub async fn edit(&self, id: i32) -> AppResult<(BookDetail, BookFormOptions)> {
        let (book, authors, genres) = tokio::try_join!(
            self.repository.books.get_by_id(id),
            self.repository.authors.list(),
            self.repository.genres.list(),
        )?;
        let book = book.ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;
        let genres = mark_checked(genres, &book.genre_ids());
        Ok((book, BookFormOptions { authors, genres }))
    }

    /// Check that the author and genres picked on the form still exist
    async fn check_references(&self, book: &NewBook) -> AppResult<Vec<FormError>> {
        let (author, genres) = tokio::try_join!(
            self.repository.authors.get_by_id(book.author_id),
            self.repository.genres.list(),
        )?;

        let mut errors = Vec::new();
        if author.is_none() {
            errors.push(FormError::new("author", "Author not found."));
        }
        if book
            .genre_ids
            .iter()
            .any(|id| !genres.iter().any(|g| g.id == *id))
        {
            errors.push(FormError::new("genre", "Genre not found."));
        }
        Ok(errors)
    }

    /// Sanitize, validate and resolve references of a submitted form
    async fn prepare(
        &self,
        form: BookForm,
    ) -> AppResult<Result<NewBook, (BookFormRetry, Vec<FormError>)>> {
        let form = form.sanitize();
        let errors = match form.to_new_book() {
            Ok(book) => {
                let errors = self.check_references(&book).await?;
                if errors.is_empty() {
                    return Ok(Ok(book));
                }
                errors
            }
            Err(errors) => errors,
        };

        let options = self.form_options(&form.selected_genre_ids()).await?;
        Ok(Err(((form, options), errors)))
    }

    pub async fn create(&self, form: BookForm) -> AppResult<Submission<Book, BookFormRetry>> {
        let book = match self.prepare(form).await? {
            Ok(book) => book,
            Err((form, errors)) => return Ok(Submission::Invalid { form, errors }),
        };

        let created = self.repository.books.insert(&book).await?;
        tracing::info!("Created book id={}", created.id);
        Ok(Submission::Saved(created))
    }

    pub async fn update(&self, id: i32, form: BookForm) -> AppResult<Submission<Book, BookFormRetry>> {
        let book = match self.prepare(form).await? {
            Ok(book) => book,
            Err((form, errors)) => return Ok(Submission::Invalid { form, errors }),
        };

        let updated = self
            .repository
            .books
            .update(id, &book)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;
        tracing::info!("Updated book id={}", id);
        Ok(Submission::Saved(updated))
    }

    /// Delete a book unless copies of it still exist
    pub async fn delete(&self, id: i32) -> AppResult<Deletion<BookPage>> {
        let Some(page) = self.find_with_instances(id).await? else {
            return Ok(Deletion::Missing);
        };

        if !page.instances.is_empty() {
            tracing::debug!(
                "Refusing to delete book id={}: {} copy(ies) reference it",
                id,
                page.instances.len()
            );
            return Ok(Deletion::Refused(page));
        }

        if self.repository.books.delete(id).await? {
            tracing::info!("Deleted book id={}", id);
        }
        Ok(Deletion::Deleted)
    }
}
