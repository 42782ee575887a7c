//! Book instance (copy) service

use crate::{
    error::{AppError, AppResult},
    models::{
        book_instance::BookRef, BookInstance, BookInstanceForm, BookInstanceWithBook,
        NewBookInstance,
    },
    repository::Repository,
    validation::FormError,
};

use super::Submission;

/// Copy form re-shown after a rejected submission
pub type BookInstanceFormRetry = (BookInstanceForm, Vec<BookRef>);

#[derive(Clone)]
pub struct BookInstancesService {
    repository: Repository,
}

impl BookInstancesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<BookInstanceWithBook>> {
        self.repository.book_instances.list().await
    }

    pub async fn find(&self, id: i32) -> AppResult<Option<BookInstanceWithBook>> {
        self.repository.book_instances.get_by_id(id).await
    }

    pub async fn detail(&self, id: i32) -> AppResult<BookInstanceWithBook> {
        self.find(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book copy not found".to_string()))
    }

    /// Books a copy can be attached to, ordered by title
    pub async fn book_options(&self) -> AppResult<Vec<BookRef>> {
        let books = self.repository.books.list().await?;
        Ok(books
            .into_iter()
            .map(|entry| BookRef {
                id: entry.book.id,
                title: entry.book.title,
            })
            .collect())
    }

    /// Existing copy plus the book list, for the update form
    pub async fn edit(&self, id: i32) -> AppResult<(BookInstanceWithBook, Vec<BookRef>)> {
        let (instance, books) = tokio::try_join!(self.find(id), self.book_options())?;
        let instance =
            instance.ok_or_else(|| AppError::NotFound("Book copy not found".to_string()))?;
        Ok((instance, books))
    }

    async fn prepare(
        &self,
        form: BookInstanceForm,
    ) -> AppResult<Result<NewBookInstance, (BookInstanceFormRetry, Vec<FormError>)>> {
        let form = form.sanitize();
        let errors = match form.to_new_instance() {
            Ok(instance) => {
                // A copy must belong to a book that exists right now
                if self
                    .repository
                    .books
                    .get_by_id(instance.book_id)
                    .await?
                    .is_some()
                {
                    return Ok(Ok(instance));
                }
                vec![FormError::new("book", "Book not found.")]
            }
            Err(errors) => errors,
        };

        let books = self.book_options().await?;
        Ok(Err(((form, books), errors)))
    }

    pub async fn create(
        &self,
        form: BookInstanceForm,
    ) -> AppResult<Submission<BookInstance, BookInstanceFormRetry>> {
        let instance = match self.prepare(form).await? {
            Ok(instance) => instance,
            Err((form, errors)) => return Ok(Submission::Invalid { form, errors }),
        };

        let created = self.repository.book_instances.insert(&instance).await?;
        tracing::info!("Created book copy id={} of book id={}", created.id, created.book_id);
        Ok(Submission::Saved(created))
    }

    pub async fn update(
        &self,
        id: i32,
        form: BookInstanceForm,
    ) -> AppResult<Submission<BookInstance, BookInstanceFormRetry>> {
        let instance = match self.prepare(form).await? {
            Ok(instance) => instance,
            Err((form, errors)) => return Ok(Submission::Invalid { form, errors }),
        };

        let updated = self
            .repository
            .book_instances
            .update(id, &instance)
            .await?
            .ok_or_else(|| AppError::NotFound("Book copy not found".to_string()))?;
        tracing::info!("Updated book copy id={}", id);
        Ok(Submission::Saved(updated))
    }

    /// Copies have no dependents, so an existing copy is always removed.
    /// Returns `false` when there was no such copy.
    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let removed = self.repository.book_instances.delete(id).await?;
        if removed {
            tracing::info!("Deleted book copy id={}", id);
        }
        Ok(removed)
    }
}
