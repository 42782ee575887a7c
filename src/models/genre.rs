//! Genre model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::validation::{self, FormError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

impl Genre {
    pub fn url(&self) -> String {
        format!("/catalog/genre/{}", self.id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenreView {
    #[serde(flatten)]
    pub genre: Genre,
    pub url: String,
}

impl From<Genre> for GenreView {
    fn from(genre: Genre) -> Self {
        Self {
            url: genre.url(),
            genre,
        }
    }
}

/// Genre entry of a book form's checkbox list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreOption {
    #[serde(flatten)]
    pub genre: Genre,
    pub checked: bool,
}

/// Mark the genres whose id appears in `selected`
pub fn mark_checked(genres: Vec<Genre>, selected: &[i32]) -> Vec<GenreOption> {
    genres
        .into_iter()
        .map(|genre| GenreOption {
            checked: selected.contains(&genre.id),
            genre,
        })
        .collect()
}

/// Genre create/update form submission
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct GenreForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Genre name required"))]
    pub name: String,
}

impl GenreForm {
    pub fn sanitize(self) -> Self {
        Self {
            name: validation::clean(&self.name),
        }
    }

    /// Check a sanitized form, returning the genre name to write
    pub fn to_name(&self) -> Result<String, Vec<FormError>> {
        let errors = validation::check(self, &["name"]);
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(self.name.clone())
    }
}
