//! # Reply
//!
//! Handler output: status, headers and a serializable body.

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, StatusCode};
use serde::Serialize;

/// A successful handler result.
#[derive(Debug, Clone)]
pub struct Reply<T> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: T,
}

impl<T: Serialize> Reply<T> {
    /// A `200 OK` reply with a JSON content type.
    #[must_use]
    pub fn ok_json(body: T) -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::from_iter([(
                CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )]),
            body,
        }
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        (self.status, self.headers, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn json_reply() {
        let reply = Reply::ok_json(json!({"type": "FeatureCollection"}));
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(
            reply.headers.get(CONTENT_TYPE).map(HeaderValue::as_bytes),
            Some(b"application/json".as_slice())
        );
    }

    #[test]
    fn into_response() {
        let response = Reply::ok_json(json!({"features": []})).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE),
            Some(&HeaderValue::from_static("application/json"))
        );
    }
}
