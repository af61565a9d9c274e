use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::errors::AppError;

/// Header carrying the caller's identity. Authentication happens upstream;
/// the value is trusted as given.
pub const OWNER_HEADER: &str = "x-user-id";
pub const EMAIL_HEADER: &str = "x-user-email";

/// Owner id taken from [`OWNER_HEADER`].
#[derive(Debug, Clone)]
pub struct OwnerId(pub String);

/// Email taken from [`EMAIL_HEADER`].
#[derive(Debug, Clone)]
pub struct OwnerEmail(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for OwnerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        required_header(parts, OWNER_HEADER).map(OwnerId)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OwnerEmail
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        required_header(parts, EMAIL_HEADER).map(OwnerEmail)
    }
}

fn required_header(parts: &Parts, name: &str) -> Result<String, AppError> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .ok_or_else(|| AppError::Validation(format!("Missing required header '{name}'")))
}
