//! HTTP span naming.

use uuid::Uuid;

/// `METHOD /path` with UUID segments collapsed so span names stay low-cardinality.
pub(super) fn request_span_name(method: &str, path: &str) -> String {
    let route = path
        .trim_start_matches('/')
        .split('/')
        .map(|segment| {
            if Uuid::parse_str(segment).is_ok() {
                "{id}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/");

    format!("{method} /{route}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_segments_are_collapsed() {
        assert_eq!(
            request_span_name(
                "PATCH",
                "/api/companies/0190a3c4-6f1e-7b7a-9c34-2f1e5a6b7c8d/toggle-status"
            ),
            "PATCH /api/companies/{id}/toggle-status"
        );
    }

    #[test]
    fn root_path_is_kept() {
        assert_eq!(request_span_name("GET", "/"), "GET /");
    }
}
