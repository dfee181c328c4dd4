//! HTTP span and metric labels.

use salvo::http::StatusCode;

const UNMATCHED_ROUTE: &str = "unmatched";

/// Route label for metrics; unrouted paths collapse to one label.
pub(super) fn route_label(path: &str, status: StatusCode) -> &str {
    if status == StatusCode::NOT_FOUND {
        UNMATCHED_ROUTE
    } else {
        path
    }
}
