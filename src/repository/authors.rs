//! Authors repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::{is_unique_violation, AuthorStore, Inserted};
use crate::{
    error::{AppError, AppResult},
    models::{Author, NewAuthor},
};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn find_by_name(&self, first_name: &str, family_name: &str) -> AppResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>(
            "SELECT * FROM authors WHERE first_name = $1 AND family_name = $2",
        )
        .bind(first_name)
        .bind(family_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(author)
    }
}

#[async_trait]
impl AuthorStore for AuthorsRepository {
    async fn list(&self) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>(
            "SELECT * FROM authors ORDER BY family_name, first_name, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(author)
    }

    async fn insert_or_get(&self, author: &NewAuthor) -> AppResult<Inserted<Author>> {
        let created = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (first_name, family_name, date_of_birth, date_of_death)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT ON CONSTRAINT authors_name_key DO NOTHING
            RETURNING *
            "#,
        )
        .bind(&author.first_name)
        .bind(&author.family_name)
        .bind(author.date_of_birth)
        .bind(author.date_of_death)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(created) = created {
            return Ok(Inserted::Created(created));
        }

        // The conflicting row may be deleted between the two statements
        self.find_by_name(&author.first_name, &author.family_name)
            .await?
            .map(Inserted::Existing)
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Author {} {} vanished after insert conflict",
                    author.first_name, author.family_name
                ))
            })
    }

    async fn update(&self, id: i32, author: &NewAuthor) -> AppResult<Option<Author>> {
        sqlx::query_as::<_, Author>(
            r#"
            UPDATE authors
            SET first_name = $1, family_name = $2, date_of_birth = $3, date_of_death = $4
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(&author.first_name)
        .bind(&author.family_name)
        .bind(author.date_of_birth)
        .bind(author.date_of_death)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("An author with this name already exists.".to_string())
            } else {
                e.into()
            }
        })
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
