//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::{
    author::{Author, AuthorView},
    genre::{Genre, GenreView},
};
use crate::validation::{self, FormError};

/// Full book model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub author_id: i32,
}

impl Book {
    pub fn url(&self) -> String {
        format!("/catalog/book/{}", self.id)
    }
}

/// Book joined with its author, as listed in the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct BookWithAuthor {
    pub book: Book,
    pub author: Author,
}

/// Book joined with its author and genres
#[derive(Debug, Clone, PartialEq)]
pub struct BookDetail {
    pub book: Book,
    pub author: Author,
    pub genres: Vec<Genre>,
}

impl BookDetail {
    pub fn genre_ids(&self) -> Vec<i32> {
        self.genres.iter().map(|g| g.id).collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookView {
    #[serde(flatten)]
    pub book: Book,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<GenreView>>,
}

impl From<Book> for BookView {
    fn from(book: Book) -> Self {
        Self {
            url: book.url(),
            author: None,
            genres: None,
            book,
        }
    }
}

impl From<BookWithAuthor> for BookView {
    fn from(entry: BookWithAuthor) -> Self {
        Self {
            url: entry.book.url(),
            author: Some(entry.author.into()),
            genres: None,
            book: entry.book,
        }
    }
}

impl From<BookDetail> for BookView {
    fn from(detail: BookDetail) -> Self {
        Self {
            url: detail.book.url(),
            author: Some(detail.author.into()),
            genres: Some(detail.genres.into_iter().map(GenreView::from).collect()),
            book: detail.book,
        }
    }
}

/// Validated book fields ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub author_id: i32,
    pub genre_ids: Vec<i32>,
}

/// Book create/update form submission.
///
/// `genre` comes from a checkbox group: the field may be missing, sent once
/// or repeated, and always lands here as a list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BookForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title must not be empty."))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Author must not be empty."))]
    pub author: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Summary must not be empty."))]
    pub summary: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "ISBN must not be empty"))]
    pub isbn: String,
    #[serde(default)]
    pub genre: Vec<String>,
}

impl BookForm {
    const FIELDS: [&'static str; 4] = ["title", "author", "summary", "isbn"];

    pub fn sanitize(self) -> Self {
        Self {
            title: validation::clean(&self.title),
            author: validation::clean(&self.author),
            summary: validation::clean(&self.summary),
            isbn: validation::clean(&self.isbn),
            genre: self.genre.iter().map(|g| validation::escape(g)).collect(),
        }
    }

    /// Genre ids the user ticked, ignoring anything unparsable
    pub fn selected_genre_ids(&self) -> Vec<i32> {
        self.genre
            .iter()
            .filter_map(|g| validation::parse_id(g.trim()))
            .collect()
    }

    /// Check a sanitized form and convert it into a writable record
    pub fn to_new_book(&self) -> Result<NewBook, Vec<FormError>> {
        let mut errors = validation::check(self, &Self::FIELDS);

        let author_id = validation::parse_id(&self.author);
        if author_id.is_none() && !self.author.is_empty() {
            errors.push(FormError::new("author", "Author must be a valid selection."));
        }

        let mut genre_ids = Vec::with_capacity(self.genre.len());
        for value in &self.genre {
            match validation::parse_id(value.trim()) {
                Some(id) if !genre_ids.contains(&id) => genre_ids.push(id),
                Some(_) => {}
                None => errors.push(FormError::new("genre", "Genre must be a valid selection.")),
            }
        }

        match author_id {
            Some(author_id) if errors.is_empty() => Ok(NewBook {
                title: self.title.clone(),
                summary: self.summary.clone(),
                isbn: self.isbn.clone(),
                author_id,
                genre_ids,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(genre: Vec<&str>) -> BookForm {
        BookForm {
            title: "Emma".to_string(),
            author: "3".to_string(),
            summary: "Matchmaking in Highbury.".to_string(),
            isbn: "9780141439587".to_string(),
            genre: genre.into_iter().map(String::from).collect(),
        }
    }

    #[test]
    fn test_converts_genre_lists() {
        assert_eq!(form(vec![]).sanitize().to_new_book().unwrap().genre_ids, Vec::<i32>::new());
        assert_eq!(form(vec!["4"]).sanitize().to_new_book().unwrap().genre_ids, vec![4]);
        assert_eq!(
            form(vec!["4", "7", "4"]).sanitize().to_new_book().unwrap().genre_ids,
            vec![4, 7]
        );
    }

    #[test]
    fn test_every_empty_field_reported() {
        let errors = BookForm::default().sanitize().to_new_book().unwrap_err();
        let params: Vec<&str> = errors.iter().map(|e| e.param.as_str()).collect();
        assert_eq!(params, vec!["title", "author", "summary", "isbn"]);
    }

    #[test]
    fn test_bad_references_reported() {
        let mut bad = form(vec!["fantasy"]);
        bad.author = "jane".to_string();
        let errors = bad.sanitize().to_new_book().unwrap_err();
        assert_eq!(
            errors,
            vec![
                FormError::new("author", "Author must be a valid selection."),
                FormError::new("genre", "Genre must be a valid selection."),
            ]
        );
    }

    #[test]
    fn test_selected_genre_ids_skip_garbage() {
        assert_eq!(form(vec!["2", "x", "5"]).selected_genre_ids(), vec![2, 5]);
    }
}
