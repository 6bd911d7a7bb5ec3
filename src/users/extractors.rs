use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::{
    error::ApiError,
    users::dto::{UserCreate, MAX_FIELD_LEN},
};

/// Request bodies that carry their own semantic checks.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Only emptiness of `name` and column width are checked; email format and
/// role values are free-form.
impl Validate for UserCreate {
    fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("name must not be empty".into());
        }
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("role", &self.role),
        ] {
            if value.chars().count() > MAX_FIELD_LEN {
                return Err(format!(
                    "{field} must be at most {MAX_FIELD_LEN} characters"
                ));
            }
        }
        Ok(())
    }
}

/// JSON body that has been deserialized and validated. Rejections are
/// rendered as `{"detail": ...}` like every other error.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            warn!(error = %e, "rejected request body");
            ApiError::from(e)
        })?;
        if let Err(msg) = value.validate() {
            warn!(reason = %msg, "request body failed validation");
            return Err(ApiError::Validation(msg));
        }
        Ok(Self(value))
    }
}

/// `{user_id}` path segment parsed as an integer; a non-integer segment is
/// rejected with a `{"detail": ...}` body.
#[derive(Debug)]
pub struct UserId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                warn!(error = %e, "rejected path id");
                ApiError::from(e)
            })?;
        Ok(Self(id))
    }
}
