//! Uniform access to request fields.
//!
//! Every render route accepts the same field names from the query string, an
//! urlencoded form, a multipart form or a JSON object. [`RequestFields`]
//! collects all of them so handlers never care how a field arrived. Body
//! fields override query fields of the same name.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Query, Request};
use axum::http::{Method, header};
use serde_json::{Map, Value};

use super::error::{AppError, AppResult};

/// A file part of a multipart form.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: Option<String>,
    pub bytes: Bytes,
}

/// All text fields and file parts of a request.
#[derive(Debug, Default)]
pub struct RequestFields {
    values: Vec<(String, String)>,
    files: Vec<(String, Upload)>,
}

impl<S> FromRequest<S> for RequestFields
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut fields = RequestFields::default();
        if let Ok(Query(pairs)) = Query::<Vec<(String, String)>>::try_from_uri(req.uri()) {
            fields.values = pairs;
        }

        if req.method() == Method::GET || req.method() == Method::HEAD {
            return Ok(fields);
        }

        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let mut multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            while let Some(field) = multipart
                .next_field()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?
            {
                let name = field.name().unwrap_or_default().to_string();
                match field.file_name().map(str::to_string) {
                    Some(filename) => {
                        let bytes = field
                            .bytes()
                            .await
                            .map_err(|e| AppError::BadRequest(e.body_text()))?;
                        // Browsers send an empty part for an unset file input.
                        if !bytes.is_empty() {
                            let filename = Some(filename).filter(|f| !f.is_empty());
                            fields.files.push((name, Upload { filename, bytes }));
                        }
                    }
                    None => {
                        let text = field
                            .text()
                            .await
                            .map_err(|e| AppError::BadRequest(e.body_text()))?;
                        fields.values.push((name, text));
                    }
                }
            }
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let axum::Form(pairs) = axum::Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            fields.values.extend(pairs);
        } else if content_type.starts_with("application/json") {
            let Json(object) = Json::<Map<String, Value>>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            fields.values.extend(
                object
                    .into_iter()
                    .filter_map(|(key, value)| json_scalar(value).map(|text| (key, text))),
            );
        }

        Ok(fields)
    }
}

fn json_scalar(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

impl RequestFields {
    /// Builds fields from literal pairs.
    pub fn from_pairs<K: Into<String>, V: Into<String>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        Self {
            values: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            files: Vec::new(),
        }
    }

    /// The last value supplied for `name`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn string(&self, name: &str) -> Option<String> {
        self.text(name).map(str::to_string)
    }

    /// A field that must be present and non-blank.
    pub fn required(&self, name: &str) -> AppResult<String> {
        match self.text(name) {
            Some(value) if !value.trim().is_empty() => Ok(value.to_string()),
            _ => Err(AppError::Unprocessable(format!("missing required field `{name}`"))),
        }
    }

    pub fn u32(&self, name: &str) -> AppResult<Option<u32>> {
        self.parsed(name)
    }

    pub fn i64(&self, name: &str) -> AppResult<Option<i64>> {
        self.parsed(name)
    }

    /// A boolean flag. Absent means false.
    pub fn flag(&self, name: &str) -> AppResult<bool> {
        let Some(value) = self.text(name) else {
            return Ok(false);
        };
        match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" | "" => Ok(false),
            _ => Err(AppError::Unprocessable(format!(
                "field `{name}` must be a boolean, got `{value}`"
            ))),
        }
    }

    /// The first uploaded file under `name`.
    pub fn file(&self, name: &str) -> Option<&Upload> {
        self.files
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, upload)| upload)
    }

    fn parsed<T: std::str::FromStr>(&self, name: &str) -> AppResult<Option<T>> {
        match self.text(name).map(str::trim) {
            None => Ok(None),
            Some(value) => value.parse().map(Some).map_err(|_| {
                AppError::Unprocessable(format!("field `{name}` must be an integer, got `{value}`"))
            }),
        }
    }
}
