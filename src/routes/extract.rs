use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{header, request::Parts},
};

use crate::{
    error::AppError,
    models::announcement::{AnnouncementParams, UsernameQuery},
};

/// Create/update input: query-string fields, overridden key by key by an
/// optional JSON body. An empty body counts as no body. Malformed input is
/// rejected as a 400 in the usual `{"detail": …}` shape.
pub struct AnnouncementInput(pub AnnouncementParams);

impl<S> FromRequest<S> for AnnouncementInput
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<AnnouncementParams>::try_from_uri(req.uri())
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(AnnouncementInput(query));
        }
        if !is_json {
            return Err(AppError::bad_request(
                "Expected request body with Content-Type: application/json",
            ));
        }

        let body: AnnouncementParams = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::bad_request(format!("Invalid JSON body: {e}")))?;
        Ok(AnnouncementInput(query.merge(body)))
    }
}

/// `?username=` for the read and delete routes.
pub struct Username(pub Option<String>);

impl<S> FromRequestParts<S> for Username
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<UsernameQuery>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::bad_request(e.body_text()))?;
        Ok(Username(query.username))
    }
}
