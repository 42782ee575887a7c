//! Book instances repository

use async_trait::async_trait;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};

use super::BookInstanceStore;
use crate::{
    error::AppResult,
    models::{
        book_instance::BookRef, BookInstance, BookInstanceStatus, BookInstanceWithBook,
        NewBookInstance,
    },
};

const INSTANCE_WITH_BOOK: &str = r#"
    SELECT bi.id, bi.book_id, bi.imprint, bi.status, bi.due_back, b.title
    FROM book_instances bi
    JOIN books b ON b.id = bi.book_id
"#;

fn book_instance(r: &PgRow) -> BookInstance {
    BookInstance {
        id: r.get("id"),
        book_id: r.get("book_id"),
        imprint: r.get("imprint"),
        status: BookInstanceStatus::from(r.get::<i16, _>("status")),
        due_back: r.get("due_back"),
    }
}

fn instance_with_book(r: &PgRow) -> BookInstanceWithBook {
    let instance = book_instance(r);
    BookInstanceWithBook {
        book: BookRef {
            id: instance.book_id,
            title: r.get("title"),
        },
        instance,
    }
}

#[derive(Clone)]
pub struct BookInstancesRepository {
    pool: Pool<Postgres>,
}

impl BookInstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookInstanceStore for BookInstancesRepository {
    async fn list(&self) -> AppResult<Vec<BookInstanceWithBook>> {
        let query = format!("{} ORDER BY bi.id", INSTANCE_WITH_BOOK);
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(instance_with_book).collect())
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<BookInstanceWithBook>> {
        let query = format!("{} WHERE bi.id = $1", INSTANCE_WITH_BOOK);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(instance_with_book))
    }

    async fn list_by_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        let rows = sqlx::query(
            "SELECT id, book_id, imprint, status, due_back FROM book_instances WHERE book_id = $1 ORDER BY id",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(book_instance).collect())
    }

    async fn insert(&self, instance: &NewBookInstance) -> AppResult<BookInstance> {
        let row = sqlx::query(
            r#"
            INSERT INTO book_instances (book_id, imprint, status, due_back)
            VALUES ($1, $2, $3, $4)
            RETURNING id, book_id, imprint, status, due_back
            "#,
        )
        .bind(instance.book_id)
        .bind(&instance.imprint)
        .bind(i16::from(instance.status))
        .bind(instance.due_back)
        .fetch_one(&self.pool)
        .await?;
        Ok(book_instance(&row))
    }

    async fn update(&self, id: i32, instance: &NewBookInstance) -> AppResult<Option<BookInstance>> {
        let row = sqlx::query(
            r#"
            UPDATE book_instances
            SET book_id = $1, imprint = $2, status = $3, due_back = $4
            WHERE id = $5
            RETURNING id, book_id, imprint, status, due_back
            "#,
        )
        .bind(instance.book_id)
        .bind(&instance.imprint)
        .bind(i16::from(instance.status))
        .bind(instance.due_back)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(book_instance))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_by_status(&self, status: BookInstanceStatus) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
            .bind(i16::from(status))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
