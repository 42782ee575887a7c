//! Author catalog service

use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorForm, Book},
    repository::{Inserted, Repository},
    validation::FormError,
};

use super::{Deletion, Submission};

/// Author with the books that reference it
#[derive(Debug, Clone)]
pub struct AuthorDetail {
    pub author: Author,
    pub books: Vec<Book>,
}

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All authors, ordered by family name
    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.list().await
    }

    pub async fn get(&self, id: i32) -> AppResult<Author> {
        self.repository
            .authors
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))
    }

    /// Author and their books, fetched together
    pub async fn find_with_books(&self, id: i32) -> AppResult<Option<AuthorDetail>> {
        let (author, books) = tokio::try_join!(
            self.repository.authors.get_by_id(id),
            self.repository.books.list_by_author(id),
        )?;
        Ok(author.map(|author| AuthorDetail { author, books }))
    }

    pub async fn detail(&self, id: i32) -> AppResult<AuthorDetail> {
        self.find_with_books(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))
    }

    /// Create an author, or hand back the existing one with the same name
    pub async fn create(&self, form: AuthorForm) -> AppResult<Submission<Author, AuthorForm>> {
        let form = form.sanitize();
        let author = match form.to_new_author() {
            Ok(author) => author,
            Err(errors) => return Ok(Submission::Invalid { form, errors }),
        };

        match self.repository.authors.insert_or_get(&author).await? {
            Inserted::Created(created) => {
                tracing::info!("Created author id={}", created.id);
                Ok(Submission::Saved(created))
            }
            Inserted::Existing(existing) => {
                tracing::debug!(
                    "Author {} {} already exists as id={}",
                    existing.first_name,
                    existing.family_name,
                    existing.id
                );
                Ok(Submission::Saved(existing))
            }
        }
    }

    pub async fn update(&self, id: i32, form: AuthorForm) -> AppResult<Submission<Author, AuthorForm>> {
        let form = form.sanitize();
        let author = match form.to_new_author() {
            Ok(author) => author,
            Err(errors) => return Ok(Submission::Invalid { form, errors }),
        };

        match self.repository.authors.update(id, &author).await {
            Ok(Some(updated)) => {
                tracing::info!("Updated author id={}", id);
                Ok(Submission::Saved(updated))
            }
            Ok(None) => Err(AppError::NotFound("Author not found".to_string())),
            Err(AppError::Conflict(msg)) => Ok(Submission::Invalid {
                form,
                errors: vec![FormError::new("family_name", &msg)],
            }),
            Err(e) => Err(e),
        }
    }

    /// Delete an author unless books still reference them
    pub async fn delete(&self, id: i32) -> AppResult<Deletion<AuthorDetail>> {
        let Some(detail) = self.find_with_books(id).await? else {
            return Ok(Deletion::Missing);
        };

        if !detail.books.is_empty() {
            tracing::debug!(
                "Refusing to delete author id={}: {} book(s) reference it",
                id,
                detail.books.len()
            );
            return Ok(Deletion::Refused(detail));
        }

        if self.repository.authors.delete(id).await? {
            tracing::info!("Deleted author id={}", id);
        }
        Ok(Deletion::Deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::NewAuthor,
        services::testing::MockStores,
    };

    fn author(id: i32, first: &str, family: &str) -> Author {
        Author {
            id,
            first_name: first.to_string(),
            family_name: family.to_string(),
            date_of_birth: None,
            date_of_death: None,
        }
    }

    fn book(id: i32, author_id: i32) -> Book {
        Book {
            id,
            title: "Emma".to_string(),
            summary: "Matchmaking.".to_string(),
            isbn: "9780141439587".to_string(),
            author_id,
        }
    }

    fn form(first: &str, family: &str) -> AuthorForm {
        AuthorForm {
            first_name: first.to_string(),
            family_name: family.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_detail_missing_author_is_not_found() {
        let mut stores = MockStores::default();
        stores.authors.expect_get_by_id().returning(|_| Ok(None));
        stores.books.expect_list_by_author().returning(|_| Ok(vec![]));
        let service = AuthorsService::new(stores.build());

        let err = service.detail(99).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_detail_joins_books() {
        let mut stores = MockStores::default();
        stores
            .authors
            .expect_get_by_id()
            .returning(|id| Ok(Some(author(id, "Jane", "Austen"))));
        stores
            .books
            .expect_list_by_author()
            .returning(|id| Ok(vec![book(1, id), book(2, id)]));
        let service = AuthorsService::new(stores.build());

        let detail = service.detail(4).await.unwrap();
        assert_eq!(detail.author.id, 4);
        assert_eq!(detail.books.len(), 2);
    }

    #[tokio::test]
    async fn test_create_sanitizes_before_insert() {
        let mut stores = MockStores::default();
        stores
            .authors
            .expect_insert_or_get()
            .withf(|a: &NewAuthor| a.first_name == "Jane" && a.family_name == "Austen")
            .times(1)
            .returning(|a| Ok(Inserted::Created(author(7, &a.first_name, &a.family_name))));
        let service = AuthorsService::new(stores.build());

        match service.create(form("  Jane ", " Austen")).await.unwrap() {
            Submission::Saved(a) => assert_eq!(a.id, 7),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_duplicate_returns_existing() {
        let mut stores = MockStores::default();
        stores
            .authors
            .expect_insert_or_get()
            .times(1)
            .returning(|_| Ok(Inserted::Existing(author(3, "Jane", "Austen"))));
        let service = AuthorsService::new(stores.build());

        match service.create(form("Jane", "Austen")).await.unwrap() {
            Submission::Saved(a) => assert_eq!(a.id, 3),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_invalid_never_writes() {
        let mut stores = MockStores::default();
        stores.authors.expect_insert_or_get().never();
        let service = AuthorsService::new(stores.build());

        match service.create(form("", "Austen")).await.unwrap() {
            Submission::Invalid { form, errors } => {
                assert_eq!(errors.len(), 2);
                assert_eq!(form.family_name, "Austen");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_name_conflict_is_form_error() {
        let mut stores = MockStores::default();
        stores.authors.expect_update().returning(|_, _| {
            Err(AppError::Conflict("An author with this name already exists.".to_string()))
        });
        let service = AuthorsService::new(stores.build());

        match service.update(5, form("Jane", "Austen")).await.unwrap() {
            Submission::Invalid { errors, .. } => {
                assert_eq!(errors[0].msg, "An author with this name already exists.")
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_missing_author_is_not_found() {
        let mut stores = MockStores::default();
        stores.authors.expect_update().returning(|_, _| Ok(None));
        let service = AuthorsService::new(stores.build());

        let err = service.update(5, form("Jane", "Austen")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_refused_with_books() {
        let mut stores = MockStores::default();
        stores
            .authors
            .expect_get_by_id()
            .returning(|id| Ok(Some(author(id, "Jane", "Austen"))));
        stores
            .books
            .expect_list_by_author()
            .returning(|id| Ok(vec![book(1, id)]));
        stores.authors.expect_delete().never();
        let service = AuthorsService::new(stores.build());

        match service.delete(3).await.unwrap() {
            Deletion::Refused(detail) => assert_eq!(detail.books.len(), 1),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_without_books() {
        let mut stores = MockStores::default();
        stores
            .authors
            .expect_get_by_id()
            .returning(|id| Ok(Some(author(id, "Jane", "Austen"))));
        stores.books.expect_list_by_author().returning(|_| Ok(vec![]));
        stores
            .authors
            .expect_delete()
            .withf(|id| *id == 3)
            .times(1)
            .returning(|_| Ok(true));
        let service = AuthorsService::new(stores.build());

        assert!(matches!(service.delete(3).await.unwrap(), Deletion::Deleted));
    }
}
