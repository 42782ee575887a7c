//! Views handed to the template layer.
//!
//! A view is a template identifier, a page title and a data payload. The
//! payload is serialized as JSON; templating itself happens outside this
//! server.

use axum::{
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::validation::FormError;

#[derive(Debug, Clone)]
pub struct View {
    template: &'static str,
    title: String,
    data: Map<String, Value>,
}

impl View {
    pub fn new(template: &'static str, title: impl Into<String>) -> Self {
        Self {
            template,
            title: title.into(),
            data: Map::new(),
        }
    }

    /// Add `value` to the payload under `key`
    pub fn with<T: Serialize>(mut self, key: &str, value: T) -> Self {
        let value = serde_json::to_value(value).unwrap_or_else(|e| {
            tracing::error!("Failed to serialize view field {}: {}", key, e);
            Value::Null
        });
        self.data.insert(key.to_string(), value);
        self
    }

    pub fn with_errors(self, errors: Vec<FormError>) -> Self {
        self.with("errors", errors)
    }

    fn into_body(self) -> Value {
        let mut body = self.data;
        body.insert("template".to_string(), Value::from(self.template));
        body.insert("title".to_string(), Value::from(self.title));
        Value::Object(body)
    }
}

impl IntoResponse for View {
    fn into_response(self) -> Response {
        Json(self.into_body()).into_response()
    }
}

/// What a form handler answers with
#[derive(Debug)]
pub enum Page {
    View(View),
    /// 303 See Other to the given path
    Redirect(String),
}

impl From<View> for Page {
    fn from(view: View) -> Self {
        Page::View(view)
    }
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        match self {
            Page::View(view) => view.into_response(),
            Page::Redirect(url) => Redirect::to(&url).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_carries_template_and_payload() {
        let body = View::new("genre_list", "Genre List")
            .with("genre_list", vec!["Fantasy", "Poetry"])
            .into_body();
        assert_eq!(body["template"], "genre_list");
        assert_eq!(body["title"], "Genre List");
        assert_eq!(body["genre_list"][1], "Poetry");
    }

    #[test]
    fn test_redirect_is_see_other() {
        let response = Page::Redirect("/catalog/genres".to_string()).into_response();
        assert_eq!(response.status(), axum::http::StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/catalog/genres");
    }
}
