//! Catalog summary service

use serde::Serialize;

use crate::{error::AppResult, models::BookInstanceStatus, repository::Repository};

/// Record counts shown on the catalog home page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogCounts {
    pub book_count: i64,
    pub book_instance_count: i64,
    pub book_instance_available_count: i64,
    pub author_count: i64,
    pub genre_count: i64,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn counts(&self) -> AppResult<CatalogCounts> {
        let (book_count, book_instance_count, book_instance_available_count, author_count, genre_count) =
            tokio::try_join!(
                self.repository.books.count(),
                self.repository.book_instances.count(),
                self.repository
                    .book_instances
                    .count_by_status(BookInstanceStatus::Available),
                self.repository.authors.count(),
                self.repository.genres.count(),
            )?;

        Ok(CatalogCounts {
            book_count,
            book_instance_count,
            book_instance_available_count,
            author_count,
            genre_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::MockStores;

    #[tokio::test]
    async fn test_counts_fan_out() {
        let mut stores = MockStores::default();
        stores.books.expect_count().returning(|| Ok(4));
        stores.book_instances.expect_count().returning(|| Ok(9));
        stores
            .book_instances
            .expect_count_by_status()
            .withf(|status| *status == BookInstanceStatus::Available)
            .returning(|_| Ok(6));
        stores.authors.expect_count().returning(|| Ok(3));
        stores.genres.expect_count().returning(|| Ok(2));
        let service = CatalogService::new(stores.build());

        assert_eq!(
            service.counts().await.unwrap(),
            CatalogCounts {
                book_count: 4,
                book_instance_count: 9,
                book_instance_available_count: 6,
                author_count: 3,
                genre_count: 2,
            }
        );
    }
}
