//! Books repository

use async_trait::async_trait;
use sqlx::{postgres::PgRow, Pool, Postgres, Row, Transaction};

use super::BookStore;
use crate::{
    error::AppResult,
    models::{Author, Book, BookDetail, BookWithAuthor, Genre, NewBook},
};

const BOOK_WITH_AUTHOR: &str = r#"
    SELECT b.id, b.title, b.summary, b.isbn, b.author_id,
           a.first_name, a.family_name, a.date_of_birth, a.date_of_death
    FROM books b
    JOIN authors a ON a.id = b.author_id
"#;

fn book_with_author(r: &PgRow) -> BookWithAuthor {
    BookWithAuthor {
        book: Book {
            id: r.get("id"),
            title: r.get("title"),
            summary: r.get("summary"),
            isbn: r.get("isbn"),
            author_id: r.get("author_id"),
        },
        author: Author {
            id: r.get("author_id"),
            first_name: r.get("first_name"),
            family_name: r.get("family_name"),
            date_of_birth: r.get("date_of_birth"),
            date_of_death: r.get("date_of_death"),
        },
    }
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Load all genres of a book via the book_genres junction table
    async fn get_book_genres(&self, book_id: i32) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>(
            r#"
            SELECT g.id, g.name
            FROM book_genres bg
            JOIN genres g ON g.id = bg.genre_id
            WHERE bg.book_id = $1
            ORDER BY g.name
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(genres)
    }

    async fn set_genres(
        tx: &mut Transaction<'_, Postgres>,
        book_id: i32,
        genre_ids: &[i32],
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(book_id)
            .execute(&mut **tx)
            .await?;

        if !genre_ids.is_empty() {
            sqlx::query(
                "INSERT INTO book_genres (book_id, genre_id) SELECT $1, UNNEST($2::int4[])",
            )
            .bind(book_id)
            .bind(genre_ids)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn list(&self) -> AppResult<Vec<BookWithAuthor>> {
        let query = format!("{} ORDER BY b.title, b.id", BOOK_WITH_AUTHOR);
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(book_with_author).collect())
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<BookDetail>> {
        let query = format!("{} WHERE b.id = $1", BOOK_WITH_AUTHOR);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let BookWithAuthor { book, author } = book_with_author(&row);
        let genres = self.get_book_genres(book.id).await?;
        Ok(Some(BookDetail {
            book,
            author,
            genres,
        }))
    }

    async fn list_by_author(&self, author_id: i32) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(
            "SELECT * FROM books WHERE author_id = $1 ORDER BY title, id",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_by_genre(&self, genre_id: i32) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(
            r#"
            SELECT b.*
            FROM books b
            JOIN book_genres bg ON bg.book_id = b.id
            WHERE bg.genre_id = $1
            ORDER BY b.title, b.id
            "#,
        )
        .bind(genre_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert(&self, book: &NewBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, summary, isbn, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.summary)
        .bind(&book.isbn)
        .bind(book.author_id)
        .fetch_one(&mut *tx)
        .await?;

        Self::set_genres(&mut tx, created.id, &book.genre_ids).await?;
        tx.commit().await?;
        Ok(created)
    }

    async fn update(&self, id: i32, book: &NewBook) -> AppResult<Option<Book>> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = $1, summary = $2, isbn = $3, author_id = $4
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.summary)
        .bind(&book.isbn)
        .bind(book.author_id)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(updated) = updated else {
            tx.rollback().await?;
            return Ok(None);
        };

        Self::set_genres(&mut tx, id, &book.genre_ids).await?;
        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        // book_genres rows go with the book (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
