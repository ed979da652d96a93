//! Mapping between stored records and their JSON representation.
//!
//! Output is plain `Serialize` on the record types. Input goes through
//! [`WireObject`] so that every rejected field is reported under its own name
//! and read-only keys (`id`, `user_id`, parent ids, timestamps) are never read.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::{AppError, ValidationErrors};
use crate::store::Record;

/// How absent fields are filled in when a request body is turned into a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Required fields must be present; optional ones take their defaults.
    Create,
    /// Required fields must be present; optional ones keep the prior value.
    Replace,
    /// Every absent field keeps the prior value.
    Patch,
}

pub trait WireRecord: Record + Serialize {
    /// Path of the single-record endpoint, without the id segment.
    const DETAIL_PATH: &'static str;

    fn to_draft(&self) -> Self::Draft;

    fn from_wire(
        body: &WireObject,
        prior: Option<&Self::Draft>,
        mode: WriteMode,
    ) -> Result<Self::Draft, AppError>;
}

/// A JSON object request body.
#[derive(Debug, Clone, Default)]
pub struct WireObject(pub Map<String, Value>);

#[async_trait]
impl<S> FromRequest<S> for WireObject
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(ValidationErrors::single("body", e.body_text())))?;
        match value {
            Value::Object(map) => Ok(WireObject(map)),
            _ => Err(AppError::Validation(ValidationErrors::single(
                "body",
                "Expected a JSON object.",
            ))),
        }
    }
}

/// The `:id` segment of a record route. Text that is not a UUID cannot name
/// any record, so it is reported as not found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<Uuid>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                tracing::debug!(reason = %e.body_text(), "unusable id in path");
                AppError::NotFound("record")
            })?;
        Ok(RecordId(id))
    }
}

impl WireObject {
    /// Reads `field` if present. Type errors are recorded under the field name.
    pub fn take<T: DeserializeOwned>(&self, field: &str, errors: &mut ValidationErrors) -> Option<T> {
        self.take_with(field, errors, |v| T::deserialize(v))
    }

    pub fn take_with<T>(
        &self,
        field: &str,
        errors: &mut ValidationErrors,
        parse: impl FnOnce(&Value) -> Result<T, serde_json::Error>,
    ) -> Option<T> {
        let value = self.0.get(field)?;
        match parse(value) {
            Ok(v) => Some(v),
            Err(_) if value.is_null() => {
                errors.add(field, "This field may not be null.");
                None
            }
            Err(e) => {
                errors.add(field, format!("Invalid value: {e}."));
                None
            }
        }
    }

    /// Reads a string field with surrounding whitespace removed.
    pub fn take_text(&self, field: &str, errors: &mut ValidationErrors) -> Option<String> {
        self.take::<String>(field, errors).map(|s| s.trim().to_string())
    }
}

impl From<Value> for WireObject {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => WireObject(map),
            _ => WireObject::default(),
        }
    }
}

/// Resolves a required field. Records "required" unless the field already
/// carries a type error.
pub fn required<T>(
    field: &str,
    supplied: Option<T>,
    prior: Option<T>,
    mode: WriteMode,
    errors: &mut ValidationErrors,
) -> Option<T> {
    if supplied.is_some() {
        return supplied;
    }
    if mode == WriteMode::Patch && prior.is_some() {
        return prior;
    }
    if errors.get(field).is_none() {
        errors.add(field, "This field is required.");
    }
    None
}

pub fn optional<T>(
    supplied: Option<T>,
    prior: Option<T>,
    mode: WriteMode,
    default: impl FnOnce() -> T,
) -> T {
    match (supplied, mode) {
        (Some(v), _) => v,
        (None, WriteMode::Create) => default(),
        (None, _) => prior.unwrap_or_else(default),
    }
}

pub fn check_text(field: &str, value: &str, min: usize, max: usize, errors: &mut ValidationErrors) {
    let len = value.chars().count();
    if min > 0 && len == 0 {
        errors.add(field, "This field may not be blank.");
    } else if len > max {
        errors.add(field, format!("Ensure this field has at most {max} characters."));
    }
}

/// `YYYY-MM-DD` dates.
pub mod iso_date {
    use serde::{de::Error as _, ser::Error as _, Deserialize, Deserializer, Serializer};
    use time::{format_description::FormatItem, macros::format_description, Date};

    const FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let text = date.format(FORMAT).map_err(S::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let text = String::deserialize(deserializer)?;
        Date::parse(&text, FORMAT).map_err(D::Error::custom)
    }
}
