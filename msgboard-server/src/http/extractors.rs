//! Custom Axum extractors

use axum::extract::{FromRequestParts, Path, Query};
use axum::http::request::Parts;
use serde::Deserialize;

use super::error::ApiError;
use crate::models::ValidationError;

const INVALID_ID: ValidationError = ValidationError::InvalidFormat {
    field: "id",
    reason: "not an integer",
};

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| ApiError::Validation(INVALID_ID))
}

/// Extract and validate an integer message id from the path
pub struct MessageId(pub i64);

impl<S> FromRequestParts<S> for MessageId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(INVALID_ID))?;

        Ok(Self(parse_id(&id)?))
    }
}

#[derive(Deserialize)]
struct IdParams {
    id: Option<String>,
}

/// Extract and validate an integer message id from `?id=`
pub struct MessageIdQuery(pub i64);

impl<S> FromRequestParts<S> for MessageIdQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<IdParams>::try_from_uri(&parts.uri)
            .map_err(|_| ApiError::Validation(INVALID_ID))?;

        match params.id {
            Some(id) => Ok(Self(parse_id(&id)?)),
            None => Err(ApiError::Validation(INVALID_ID)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn from_query(uri: &str) -> Result<i64, ApiError> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        MessageIdQuery::from_request_parts(&mut parts, &())
            .await
            .map(|MessageIdQuery(id)| id)
    }

    #[test]
    fn parses_integers() {
        assert_eq!(parse_id("1").unwrap(), 1);
        assert_eq!(parse_id("+12").unwrap(), 12);
        assert!(parse_id("abc").is_err());
        assert!(parse_id("1.5").is_err());
        assert!(parse_id("").is_err());
    }

    #[tokio::test]
    async fn query_id() {
        assert_eq!(from_query("/api/messages?id=5").await.unwrap(), 5);
        assert!(from_query("/api/messages?id=five").await.is_err());
        assert!(from_query("/api/messages").await.is_err());
    }
}
