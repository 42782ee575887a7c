//! Genre catalog service

use crate::{
    error::{AppError, AppResult},
    models::{Book, Genre, GenreForm},
    repository::{Inserted, Repository},
    validation::FormError,
};

use super::{Deletion, Submission};

/// Genre with the books filed under it
#[derive(Debug, Clone)]
pub struct GenreDetail {
    pub genre: Genre,
    pub books: Vec<Book>,
}

#[derive(Clone)]
pub struct GenresService {
    repository: Repository,
}

impl GenresService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    pub async fn get(&self, id: i32) -> AppResult<Genre> {
        self.repository
            .genres
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Genre not found".to_string()))
    }

    pub async fn find_with_books(&self, id: i32) -> AppResult<Option<GenreDetail>> {
        let (genre, books) = tokio::try_join!(
            self.repository.genres.get_by_id(id),
            self.repository.books.list_by_genre(id),
        )?;
        Ok(genre.map(|genre| GenreDetail { genre, books }))
    }

    pub async fn detail(&self, id: i32) -> AppResult<GenreDetail> {
        self.find_with_books(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Genre not found".to_string()))
    }

    /// Create a genre, or hand back the existing one with the same name
    pub async fn create(&self, form: GenreForm) -> AppResult<Submission<Genre, GenreForm>> {
        let form = form.sanitize();
        let name = match form.to_name() {
            Ok(name) => name,
            Err(errors) => return Ok(Submission::Invalid { form, errors }),
        };

        let genre = match self.repository.genres.insert_or_get(&name).await? {
            Inserted::Created(genre) => {
                tracing::info!("Created genre id={}", genre.id);
                genre
            }
            Inserted::Existing(genre) => {
                tracing::debug!("Genre {} already exists as id={}", genre.name, genre.id);
                genre
            }
        };
        Ok(Submission::Saved(genre))
    }

    pub async fn update(&self, id: i32, form: GenreForm) -> AppResult<Submission<Genre, GenreForm>> {
        let form = form.sanitize();
        let name = match form.to_name() {
            Ok(name) => name,
            Err(errors) => return Ok(Submission::Invalid { form, errors }),
        };

        match self.repository.genres.update(id, &name).await {
            Ok(Some(genre)) => {
                tracing::info!("Updated genre id={}", id);
                Ok(Submission::Saved(genre))
            }
            Ok(None) => Err(AppError::NotFound("Genre not found".to_string())),
            Err(AppError::Conflict(msg)) => Ok(Submission::Invalid {
                form,
                errors: vec![FormError::new("name", &msg)],
            }),
            Err(e) => Err(e),
        }
    }

    /// Delete a genre unless books are still filed under it
    pub async fn delete(&self, id: i32) -> AppResult<Deletion<GenreDetail>> {
        let Some(detail) = self.find_with_books(id).await? else {
            return Ok(Deletion::Missing);
        };

        if !detail.books.is_empty() {
            tracing::debug!(
                "Refusing to delete genre id={}: {} book(s) reference it",
                id,
                detail.books.len()
            );
            return Ok(Deletion::Refused(detail));
        }

        if self.repository.genres.delete(id).await? {
            tracing::info!("Deleted genre id={}", id);
        }
        Ok(Deletion::Deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::MockStores;

    fn fantasy() -> Genre {
        Genre {
            id: 2,
            name: "Fantasy".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_existing_name_is_idempotent() {
        let mut stores = MockStores::default();
        stores
            .genres
            .expect_insert_or_get()
            .withf(|name: &str| name == "Fantasy")
            .times(1)
            .returning(|_| Ok(Inserted::Existing(fantasy())));
        let service = GenresService::new(stores.build());

        let form = GenreForm {
            name: " Fantasy ".to_string(),
        };
        match service.create(form).await.unwrap() {
            Submission::Saved(genre) => assert_eq!(genre, fantasy()),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_blank_name_rerenders() {
        let mut stores = MockStores::default();
        stores.genres.expect_insert_or_get().never();
        let service = GenresService::new(stores.build());

        match service.create(GenreForm::default()).await.unwrap() {
            Submission::Invalid { errors, .. } => assert_eq!(errors.len(), 1),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_refused_while_books_filed() {
        let mut stores = MockStores::default();
        stores.genres.expect_get_by_id().returning(|_| Ok(Some(fantasy())));
        stores.books.expect_list_by_genre().returning(|_| {
            Ok(vec![Book {
                id: 8,
                title: "The Name of the Wind".to_string(),
                summary: "Kvothe.".to_string(),
                isbn: "9780756404741".to_string(),
                author_id: 1,
            }])
        });
        stores.genres.expect_delete().never();
        let service = GenresService::new(stores.build());

        assert!(matches!(service.delete(2).await.unwrap(), Deletion::Refused(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_genre() {
        let mut stores = MockStores::default();
        stores.genres.expect_get_by_id().returning(|_| Ok(None));
        stores.books.expect_list_by_genre().returning(|_| Ok(vec![]));
        let service = GenresService::new(stores.build());

        assert!(matches!(service.delete(2).await.unwrap(), Deletion::Missing));
    }

    #[tokio::test]
    async fn test_store_errors_propagate() {
        let mut stores = MockStores::default();
        stores
            .genres
            .expect_get_by_id()
            .returning(|_| Err(AppError::Database(sqlx::Error::PoolTimedOut)));
        stores.books.expect_list_by_genre().returning(|_| Ok(vec![]));
        let service = GenresService::new(stores.build());

        let err = service.detail(2).await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
