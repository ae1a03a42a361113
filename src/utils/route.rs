//! Route pattern extraction utilities.

use actix_web::HttpRequest;

/// Route label used for metrics
///
/// Uses the matched resource pattern so unknown paths collapse into a single
/// label instead of growing the metric cardinality.
pub fn extract_route_pattern(req: &HttpRequest) -> String {
    req.match_pattern()
        .unwrap_or_else(|| "/unmatched".to_string())
}
