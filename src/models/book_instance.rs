//! Book instance (physical copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{enums::BookInstanceStatus, format_date};
use crate::validation::{self, FormError};

/// Full book instance model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookInstance {
    pub id: i32,
    pub book_id: i32,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: Option<NaiveDate>,
}

impl BookInstance {
    pub fn url(&self) -> String {
        format!("/catalog/bookinstance/{}", self.id)
    }
}

/// Id and title of the book a copy belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRef {
    pub id: i32,
    pub title: String,
}

impl BookRef {
    pub fn url(&self) -> String {
        format!("/catalog/book/{}", self.id)
    }
}

/// Copy joined with its parent book
#[derive(Debug, Clone, PartialEq)]
pub struct BookInstanceWithBook {
    pub instance: BookInstance,
    pub book: BookRef,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookRefView {
    #[serde(flatten)]
    pub book: BookRef,
    pub url: String,
}

impl From<BookRef> for BookRefView {
    fn from(book: BookRef) -> Self {
        Self {
            url: book.url(),
            book,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookInstanceView {
    #[serde(flatten)]
    pub instance: BookInstance,
    pub url: String,
    pub due_back_formatted: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book: Option<BookRefView>,
}

impl From<BookInstance> for BookInstanceView {
    fn from(instance: BookInstance) -> Self {
        Self {
            url: instance.url(),
            due_back_formatted: format_date(instance.due_back),
            book: None,
            instance,
        }
    }
}

impl From<BookInstanceWithBook> for BookInstanceView {
    fn from(entry: BookInstanceWithBook) -> Self {
        let mut view = BookInstanceView::from(entry.instance);
        view.book = Some(entry.book.into());
        view
    }
}

/// Validated copy fields ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct NewBookInstance {
    pub book_id: i32,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: Option<NaiveDate>,
}

/// Book instance create/update form submission
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BookInstanceForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Book must be specified"))]
    pub book: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Imprint must be specified"))]
    pub imprint: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub due_back: Option<String>,
}

impl BookInstanceForm {
    const FIELDS: [&'static str; 2] = ["book", "imprint"];

    pub fn sanitize(self) -> Self {
        Self {
            book: validation::clean(&self.book),
            imprint: validation::clean(&self.imprint),
            status: validation::clean_optional(self.status.as_deref()),
            due_back: validation::clean_optional(self.due_back.as_deref()),
        }
    }

    /// Check a sanitized form and convert it into a writable record
    pub fn to_new_instance(&self) -> Result<NewBookInstance, Vec<FormError>> {
        let mut errors = validation::check(self, &Self::FIELDS);

        let book_id = validation::parse_id(&self.book);
        if book_id.is_none() && !self.book.is_empty() {
            errors.push(FormError::new("book", "Book must be a valid selection."));
        }

        let status = match self.status.as_deref() {
            None => BookInstanceStatus::default(),
            Some(value) => value.parse().unwrap_or_else(|_| {
                errors.push(FormError::new("status", "Invalid status"));
                BookInstanceStatus::default()
            }),
        };

        let due_back = validation::parse_optional_date(
            self.due_back.as_deref(),
            "due_back",
            "Invalid date",
            &mut errors,
        );

        match book_id {
            Some(book_id) if errors.is_empty() => Ok(NewBookInstance {
                book_id,
                imprint: self.imprint.clone(),
                status,
                due_back,
            }),
            _ => Err(errors),
        }
    }
}
