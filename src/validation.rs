use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::{StatusCode, request::Parts},
};
use serde::de::DeserializeOwned;

use crate::{
    error::{AppError, FieldError},
    models::{
        GenreInput, MovieCreate, MovieFilterQuery, MovieUpdate, PageQuery, PersonInput,
        ReviewCreate, SearchQuery,
    },
    repo::Page,
};

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 10.0;

pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

#[derive(Debug, Default)]
struct Violations(Vec<FieldError>);

impl Violations {
    fn check(&mut self, ok: bool, field: &str, message: &str) -> &mut Self {
        if !ok {
            self.0.push(FieldError::new(field, message));
        }
        self
    }

    fn not_blank(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(!value.trim().is_empty(), field, "must not be blank")
    }

    fn rating(&mut self, field: &str, value: f64) -> &mut Self {
        self.check(
            (MIN_RATING..=MAX_RATING).contains(&value),
            field,
            "must be between 0 and 10",
        )
    }

    fn skip(&mut self, skip: u64) -> &mut Self {
        self.check(skip <= Page::MAX_SKIP, "skip", "is too large")
    }

    fn limit(&mut self, limit: u64) -> &mut Self {
        self.check(
            (1..=Page::MAX_LIMIT).contains(&limit),
            "limit",
            "must be between 1 and 1000",
        )
    }

    fn finish(&mut self) -> Result<(), AppError> {
        if self.0.is_empty() { Ok(()) } else { Err(AppError::Validation(std::mem::take(&mut self.0))) }
    }
}

impl Validate for PageQuery {
    fn validate(&self) -> Result<(), AppError> {
        Violations::default().skip(self.skip).limit(self.limit).finish()
    }
}

impl Validate for SearchQuery {
    fn validate(&self) -> Result<(), AppError> {
        Violations::default().not_blank("q", &self.q).skip(self.skip).limit(self.limit).finish()
    }
}

impl Validate for MovieFilterQuery {
    fn validate(&self) -> Result<(), AppError> {
        Violations::default().skip(self.skip).limit(self.limit).finish()
    }
}

impl Validate for PersonInput {
    fn validate(&self) -> Result<(), AppError> {
        Violations::default().not_blank("name", &self.name).finish()
    }
}

impl Validate for GenreInput {
    fn validate(&self) -> Result<(), AppError> {
        Violations::default().not_blank("name", &self.name).finish()
    }
}

impl Validate for ReviewCreate {
    fn validate(&self) -> Result<(), AppError> {
        Violations::default()
            .not_blank("reviewer_name", &self.reviewer_name)
            .rating("rating", self.rating)
            .finish()
    }
}

impl Validate for MovieCreate {
    fn validate(&self) -> Result<(), AppError> {
        let mut v = Violations::default();
        v.not_blank("title", &self.title);
        if let Some(rating) = self.rating {
            v.rating("rating", rating);
        }
        if let Some(runtime) = self.runtime_minutes {
            v.check(runtime >= 0, "runtime_minutes", "must not be negative");
        }
        v.finish()
    }
}

impl Validate for MovieUpdate {
    fn validate(&self) -> Result<(), AppError> {
        let mut v = Violations::default();
        if let Some(title) = &self.title {
            v.not_blank("title", title);
        }
        if let Some(rating) = self.rating {
            v.rating("rating", rating);
        }
        if let Some(Some(runtime)) = self.runtime_minutes {
            v.check(runtime >= 0, "runtime_minutes", "must not be negative");
        }
        v.finish()
    }
}

/// JSON body extractor that runs [`Validate`] before the handler sees it.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::UNPROCESSABLE_ENTITY {
                AppError::Validation(vec![FieldError::new("body", rejection.body_text())])
            } else {
                AppError::BadRequest(rejection.body_text())
            }
        })?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Query-string extractor that runs [`Validate`] before the handler sees it.
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Validation(vec![FieldError::new("query", rejection.body_text())]))?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Path-parameter extractor that reports malformed segments as a 422.
pub struct ValidPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Validation(vec![FieldError::new("path", rejection.body_text())]))?;
        Ok(Self(value))
    }
}
