//! Identity middleware
//!
//! Authentication happens upstream at the identity gateway, which forwards the
//! caller's user id in the `X-User-Id` header. This middleware only turns that
//! header into a `RequestContext`; a missing header yields an anonymous
//! context and the service decides whether that is acceptable.

use axum::{extract::Request, middleware::Next, response::Response};
use common::{RequestContext, context::USER_ID_HEADER};
use tracing::error;

use crate::error::ApiError;

/// Identity middleware
pub async fn identity_middleware(mut req: Request, next: Next) -> Result<Response, ApiError> {
    let ctx = match req.headers().get(USER_ID_HEADER) {
        Some(value) => {
            let user_id = value.to_str().map_err(|e| {
                error!("Invalid {} header: {}", USER_ID_HEADER, e);
                ApiError::BadRequest(format!("Invalid {} header", USER_ID_HEADER))
            })?;
            RequestContext::authenticated(user_id)
        }
        None => RequestContext::anonymous(),
    };

    // Insert the context into the request extensions
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}
