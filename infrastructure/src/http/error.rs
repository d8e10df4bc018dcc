//! HTTP status classification into the [`ApiError`] taxonomy.

use parley_domain::{ApiError, ValidationIssue};
use reqwest::StatusCode;

/// Fallback when a 429 carries no usable `Retry-After` header.
const DEFAULT_RETRY_AFTER_MS: u64 = 60_000;

/// Classify a non-success response into exactly one [`ApiError`] variant.
///
/// `resource` and `id` name what the request addressed, so a 404 can report
/// what was missing. Pure: the body has already been read.
pub(crate) fn classify_response(
    status: StatusCode,
    retry_after: Option<&str>,
    body: &str,
    resource: &str,
    id: &str,
) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Auth {
            message: body_message(body, status),
            status_code: status.as_u16(),
        },
        StatusCode::NOT_FOUND => ApiError::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        },
        StatusCode::CONFLICT => ApiError::Conflict {
            message: body_message(body, status),
            conflicting_resource: body_field(body, "conflictingResource"),
        },
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimit {
            retry_after_ms: parse_retry_after(retry_after),
        },
        s if s.is_server_error() => ApiError::Server {
            status_code: s.as_u16(),
            message: body_message(body, s),
        },
        // 400 and every remaining 4xx: the request itself was rejected.
        s => ApiError::Validation {
            issues: vec![ValidationIssue::new("request", body_message(body, s))],
        },
    }
}

/// `Retry-After` in seconds, converted to milliseconds.
fn parse_retry_after(header: Option<&str>) -> u64 {
    header
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|seconds| seconds.saturating_mul(1000))
        .unwrap_or(DEFAULT_RETRY_AFTER_MS)
}

/// Best-effort human message: the body's JSON `message` field, then the raw
/// body, then the status line.
fn body_message(body: &str, status: StatusCode) -> String {
    if let Some(message) = body_field(body, "message") {
        return message;
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

fn body_field(body: &str, field: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get(field)?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(status: u16, retry_after: Option<&str>, body: &str) -> ApiError {
        classify_response(
            StatusCode::from_u16(status).unwrap(),
            retry_after,
            body,
            "debate",
            "d1",
        )
    }

    #[test]
    fn auth_statuses_map_to_auth() {
        for status in [401, 403] {
            let err = classify(status, None, "");
            assert!(matches!(err, ApiError::Auth { status_code, .. } if status_code == status));
        }
    }

    #[test]
    fn not_found_names_the_resource() {
        assert_eq!(
            classify(404, None, ""),
            ApiError::NotFound {
                resource: "debate".into(),
                id: "d1".into(),
            }
        );
    }

    #[test]
    fn conflict_extracts_the_conflicting_resource() {
        let body = r#"{"message":"already running","conflictingResource":"debate/d0"}"#;
        assert_eq!(
            classify(409, None, body),
            ApiError::Conflict {
                message: "already running".into(),
                conflicting_resource: Some("debate/d0".into()),
            }
        );
    }

    #[test]
    fn rate_limit_honors_retry_after_seconds() {
        assert_eq!(
            classify(429, Some("60"), ""),
            ApiError::RateLimit {
                retry_after_ms: 60_000
            }
        );
    }

    #[test]
    fn rate_limit_defaults_when_the_header_is_absent_or_garbage() {
        for header in [None, Some("soon"), Some("")] {
            assert_eq!(
                classify(429, header, ""),
                ApiError::RateLimit {
                    retry_after_ms: 60_000
                }
            );
        }
    }

    #[test]
    fn server_errors_carry_the_status() {
        let err = classify(503, None, "overloaded");
        assert_eq!(
            err,
            ApiError::Server {
                status_code: 503,
                message: "overloaded".into(),
            }
        );
    }

    #[test]
    fn bad_request_synthesizes_a_validation_issue_from_the_body_message() {
        let err = classify(400, None, r#"{"message":"question too short"}"#);
        let ApiError::Validation { issues } = err else {
            panic!("expected validation");
        };
        assert_eq!(issues, vec![ValidationIssue::new("request", "question too short")]);
    }

    #[test]
    fn unrecognized_4xx_falls_back_to_validation_with_the_status_line() {
        let err = classify(418, None, "");
        let ApiError::Validation { issues } = err else {
            panic!("expected validation");
        };
        assert_eq!(issues[0].message, "I'm a teapot");
    }
}
