//! Business logic services

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod genres;

use crate::{repository::Repository, validation::FormError};

/// Outcome of a create or update form submission
#[derive(Debug)]
pub enum Submission<T, F> {
    /// The record was written (or an identical one already existed)
    Saved(T),
    /// Nothing was written; `form` is what should be shown again
    Invalid { form: F, errors: Vec<FormError> },
}

/// Outcome of a delete confirmation
#[derive(Debug)]
pub enum Deletion<D> {
    Deleted,
    /// Dependent records still reference the target
    Refused(D),
    Missing,
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub authors: authors::AuthorsService,
    pub genres: genres::GenresService,
    pub books: books::BooksService,
    pub book_instances: book_instances::BookInstancesService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            authors: authors::AuthorsService::new(repository.clone()),
            genres: genres::GenresService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            book_instances: book_instances::BookInstancesService::new(repository),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use crate::repository::{
        MockAuthorStore, MockBookInstanceStore, MockBookStore, MockGenreStore, Repository,
    };

    /// Mocks for every store; tests set expectations then call `build`
    #[derive(Default)]
    pub struct MockStores {
        pub authors: MockAuthorStore,
        pub genres: MockGenreStore,
        pub books: MockBookStore,
        pub book_instances: MockBookInstanceStore,
    }

    impl MockStores {
        pub fn build(self) -> Repository {
            Repository {
                authors: Arc::new(self.authors),
                genres: Arc::new(self.genres),
                books: Arc::new(self.books),
                book_instances: Arc::new(self.book_instances),
            }
        }
    }
}
