//! Custom extractors for request processing

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;

/// Header naming the owner whose feedback should be aggregated
pub const OWNER_HEADER: &str = "x-owner-id";

const MAX_OWNER_LEN: usize = 128;

/// Owner scope taken from the `X-Owner-Id` header
///
/// `None` means the request covers every owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerScope(pub Option<String>);

impl OwnerScope {
    /// Owner id as a borrowed string
    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OwnerScope
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(OWNER_HEADER) else {
            return Ok(Self(None));
        };

        let owner = value
            .to_str()
            .map_err(|_| ApiError::invalid_parameters("X-Owner-Id header is not valid UTF-8"))?
            .trim();

        if owner.is_empty() || owner.chars().count() > MAX_OWNER_LEN {
            return Err(ApiError::invalid_parameters(format!(
                "X-Owner-Id must be between 1 and {MAX_OWNER_LEN} characters"
            )));
        }

        Ok(Self(Some(owner.to_string())))
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use pretty_assertions::assert_eq;

    async fn extract(header: Option<&str>) -> Result<OwnerScope, ApiError> {
        let mut builder = Request::builder().uri("/feedbacks/average");
        if let Some(value) = header {
            builder = builder.header("X-Owner-Id", value);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        OwnerScope::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_missing_header_is_unscoped() {
        assert_eq!(extract(None).await.unwrap(), OwnerScope(None));
    }

    #[tokio::test]
    async fn test_header_is_trimmed() {
        let scope = extract(Some("  acme ")).await.unwrap();
        assert_eq!(scope.as_deref(), Some("acme"));
    }

    #[tokio::test]
    async fn test_blank_or_long_header_rejected() {
        let err = extract(Some("   ")).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "INVALID_PARAMETERS");

        let long = "x".repeat(129);
        assert!(extract(Some(&long)).await.is_err());
    }
}
