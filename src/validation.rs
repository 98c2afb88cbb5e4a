// Request validation utilities
// Declared field schemas for JSON bodies and typed path ids

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

use crate::error::ApiError;

/// A request body type with a declared set of accepted keys
///
/// Any key outside `FIELDS` rejects the whole body before anything is
/// deserialized or persisted.
pub trait FieldSchema: DeserializeOwned {
    const FIELDS: &'static [&'static str];
}

/// Check a JSON body against `T::FIELDS`, then deserialize it
pub fn parse_fields<T: FieldSchema>(body: Value) -> Result<T, ApiError> {
    let Value::Object(map) = &body else {
        return Err(ApiError::Validation(
            "Request body must be a JSON object".to_string(),
        ));
    };

    if let Some(field) = map.keys().find(|key| !T::FIELDS.contains(&key.as_str())) {
        tracing::debug!("Rejected body with disallowed field '{}'", field);
        return Err(ApiError::Validation(format!(
            "Invalid properties! '{}' is not one of: {}",
            field,
            T::FIELDS.join(", ")
        )));
    }

    serde_json::from_value(body).map_err(|e| ApiError::Validation(e.to_string()))
}

/// JSON body extractor enforcing the field schema and `validator` rules
pub struct Fields<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Fields<T>
where
    S: Send + Sync,
    T: FieldSchema + Validate + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state).await?;
        let value = parse_fields::<T>(body)?;
        value.validate()?;
        Ok(Fields(value))
    }
}

/// JSON body extractor applying only `validator` rules
///
/// Keys the target type does not declare are ignored rather than rejected.
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidJson(value))
    }
}

/// Numeric `:id` path segment; anything else is a 400 with a JSON body
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state).await?;
        Ok(IdPath(id))
    }
}
