//! Conversion of rendered pages and store outcomes into HTTP responses

use axum::{
    body::Body,
    http::{
        header::{
            ALLOW,
            CONTENT_TYPE,
        },
        HeaderValue,
        StatusCode,
    },
    response::{
        IntoResponse,
        Response,
    },
};
use tracing::{
    debug,
    error,
    warn,
};
use wasi_results_core::{
    render::render_error_page,
    RawBlob,
    ResultsError,
    ResultsResult,
};

/// Content type of every rendered page
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
const DEFAULT_RAW_CONTENT_TYPE: &str = "application/json";

/// 200 response carrying a rendered page
pub fn page(html: String) -> Response {
    html_response(StatusCode::OK, html)
}

/// Rendered page, or the error page matching the failure
pub fn page_or_error(result: ResultsResult<String>) -> Response {
    match result {
        Ok(html) => page(html),
        Err(e) => error_response(&e),
    }
}

/// Forward an upstream blob with its status, content type and body
pub fn raw(blob: RawBlob) -> Response {
    let status = StatusCode::from_u16(blob.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = blob
        .content_type
        .as_deref()
        .and_then(|value| HeaderValue::from_str(value).ok())
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_RAW_CONTENT_TYPE));
    (status, [(CONTENT_TYPE, content_type)], Body::from(blob.body)).into_response()
}

/// Liveness probe answer
pub fn health() -> Response {
    (StatusCode::OK, [(CONTENT_TYPE, "text/plain; charset=utf-8")], "ok").into_response()
}

/// 405 for anything but GET and HEAD
pub fn method_not_allowed() -> Response {
    let mut response = html_response(
        StatusCode::METHOD_NOT_ALLOWED,
        render_error_page("405 Method Not Allowed", "Only GET requests are served."),
    );
    response.headers_mut().insert(ALLOW, HeaderValue::from_static("GET, HEAD"));
    response
}

/// Map a failure onto a status code and a generic page
///
/// The page never carries the error text; the details go to the log.
pub fn error_response(err: &ResultsError) -> Response {
    let key = err.key().unwrap_or("-");
    let (status, detail) = match err {
        ResultsError::NotFound { .. } => {
            debug!(key, "not found");
            (StatusCode::NOT_FOUND, "No results exist at this address.")
        },
        ResultsError::InvalidKey { .. } => {
            debug!(key, error = %err, "rejected request path");
            (StatusCode::BAD_REQUEST, "This address is not a valid results path.")
        },
        ResultsError::Upstream { .. } | ResultsError::Parse { .. } => {
            warn!(key, error = %err, "result store failure");
            (StatusCode::BAD_GATEWAY, "The result store could not be read. Please try again later.")
        },
        ResultsError::Config(_) => {
            error!(error = %err, "configuration failure while serving");
            (StatusCode::INTERNAL_SERVER_ERROR, "The server is misconfigured.")
        },
    };
    html_response(status, render_error_page(&status_line(status), detail))
}

fn status_line(status: StatusCode) -> String {
    format!("{} {}", status.as_u16(), status.canonical_reason().unwrap_or("Error"))
}

fn html_response(status: StatusCode, html: String) -> Response {
    (status, [(CONTENT_TYPE, HTML_CONTENT_TYPE)], html).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_error() -> ResultsError {
        ResultsError::Parse {
            key:    "abc/x.json".to_string(),
            source: serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
        }
    }

    #[test]
    fn test_page_is_200_html() {
        let response = page("<p>hi</p>".to_string());
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], HTML_CONTENT_TYPE);
    }

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (ResultsError::not_found("a.json"), StatusCode::NOT_FOUND),
            (
                ResultsError::InvalidKey {
                    key:    "..".to_string(),
                    reason: "relative segment".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (ResultsError::upstream("a.json", "HTTP 500"), StatusCode::BAD_GATEWAY),
            (parse_error(), StatusCode::BAD_GATEWAY),
            (ResultsError::config("missing"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            let response = error_response(&err);
            assert_eq!(response.status(), status, "{:?}", err);
            assert_eq!(response.headers()[CONTENT_TYPE], HTML_CONTENT_TYPE);
        }
    }

    #[test]
    fn test_raw_forwards_status_and_type() {
        let response = raw(RawBlob {
            status:       404,
            content_type: Some("application/json; charset=utf-8".to_string()),
            body:         b"{}".to_vec(),
        });
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json; charset=utf-8");

        let response = raw(RawBlob {
            status:       200,
            content_type: None,
            body:         Vec::new(),
        });
        assert_eq!(response.headers()[CONTENT_TYPE], DEFAULT_RAW_CONTENT_TYPE);
    }

    #[test]
    fn test_method_not_allowed() {
        let response = method_not_allowed();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "GET, HEAD");
    }

    #[test]
    fn test_status_line() {
        assert_eq!(status_line(StatusCode::NOT_FOUND), "404 Not Found");
        assert_eq!(status_line(StatusCode::BAD_GATEWAY), "502 Bad Gateway");
    }
}
