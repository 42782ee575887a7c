//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::format_date;
use crate::validation::{self, FormError, ALPHANUMERIC};

/// Full author model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    /// "Family, First", or empty when either part is missing
    pub fn name(&self) -> String {
        if self.first_name.is_empty() || self.family_name.is_empty() {
            return String::new();
        }
        format!("{}, {}", self.family_name, self.first_name)
    }

    pub fn lifespan(&self) -> String {
        format!(
            "{} - {}",
            format_date(self.date_of_birth),
            format_date(self.date_of_death)
        )
    }

    pub fn url(&self) -> String {
        format!("/catalog/author/{}", self.id)
    }
}

/// Author with display fields, as handed to views
#[derive(Debug, Clone, Serialize)]
pub struct AuthorView {
    #[serde(flatten)]
    pub author: Author,
    pub name: String,
    pub lifespan: String,
    pub url: String,
}

impl From<Author> for AuthorView {
    fn from(author: Author) -> Self {
        Self {
            name: author.name(),
            lifespan: author.lifespan(),
            url: author.url(),
            author,
        }
    }
}

/// Validated author fields ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuthor {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

/// Author create/update form submission
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AuthorForm {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "First name must be specified."),
        regex(path = *ALPHANUMERIC, message = "First name has non-alphanumeric characters.")
    )]
    pub first_name: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Family name must be specified."),
        regex(path = *ALPHANUMERIC, message = "Family name has non-alphanumeric characters.")
    )]
    pub family_name: String,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub date_of_death: Option<String>,
}

impl AuthorForm {
    const FIELDS: [&'static str; 2] = ["first_name", "family_name"];

    pub fn sanitize(self) -> Self {
        Self {
            first_name: validation::clean(&self.first_name),
            family_name: validation::clean(&self.family_name),
            date_of_birth: validation::clean_optional(self.date_of_birth.as_deref()),
            date_of_death: validation::clean_optional(self.date_of_death.as_deref()),
        }
    }

    /// Check a sanitized form and convert it into a writable record
    pub fn to_new_author(&self) -> Result<NewAuthor, Vec<FormError>> {
        let mut errors = validation::check(self, &Self::FIELDS);
        let date_of_birth = validation::parse_optional_date(
            self.date_of_birth.as_deref(),
            "date_of_birth",
            "Invalid date of birth",
            &mut errors,
        );
        let date_of_death = validation::parse_optional_date(
            self.date_of_death.as_deref(),
            "date_of_death",
            "Invalid date of death",
            &mut errors,
        );

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewAuthor {
            first_name: self.first_name.clone(),
            family_name: self.family_name.clone(),
            date_of_birth,
            date_of_death,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn austen() -> Author {
        Author {
            id: 3,
            first_name: "Jane".to_string(),
            family_name: "Austen".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1775, 12, 16),
            date_of_death: None,
        }
    }

    #[test]
    fn test_display_fields() {
        let author = austen();
        assert_eq!(author.name(), "Austen, Jane");
        assert_eq!(author.lifespan(), "Dec 16, 1775 - ");
        assert_eq!(author.url(), "/catalog/author/3");
    }

    #[test]
    fn test_name_empty_when_part_missing() {
        let mut author = austen();
        author.first_name.clear();
        assert_eq!(author.name(), "");
    }

    #[test]
    fn test_valid_form_converts() {
        let form = AuthorForm {
            first_name: "  Jane ".to_string(),
            family_name: "Austen".to_string(),
            date_of_birth: Some("1775-12-16".to_string()),
            date_of_death: Some("".to_string()),
        }
        .sanitize();

        let author = form.to_new_author().unwrap();
        assert_eq!(author.first_name, "Jane");
        assert_eq!(author.date_of_birth, NaiveDate::from_ymd_opt(1775, 12, 16));
        assert_eq!(author.date_of_death, None);
    }

    #[test]
    fn test_empty_name_violates_both_rules() {
        let form = AuthorForm {
            first_name: "   ".to_string(),
            family_name: "Austen".to_string(),
            ..Default::default()
        }
        .sanitize();

        let errors = form.to_new_author().unwrap_err();
        assert_eq!(
            errors,
            vec![
                FormError::new("first_name", "First name must be specified."),
                FormError::new("first_name", "First name has non-alphanumeric characters."),
            ]
        );
    }

    #[test]
    fn test_bad_dates_reported() {
        let form = AuthorForm {
            first_name: "Jane".to_string(),
            family_name: "Austen".to_string(),
            date_of_birth: Some("sometime".to_string()),
            date_of_death: Some("1817-07-18".to_string()),
        }
        .sanitize();

        let errors = form.to_new_author().unwrap_err();
        assert_eq!(errors, vec![FormError::new("date_of_birth", "Invalid date of birth")]);
    }
}
