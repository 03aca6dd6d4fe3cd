//! Session-resumption wire conventions.
//!
//! On a reconnect the client identifies itself and names the last sequence
//! number it processed, and the server may reject that checkpoint by closing
//! with a recognised code or reason. These constants are the interoperability
//! contract and must match the server exactly.

/// Query parameter carrying the client identity.
pub const PARAM_CLIENT_ID: &str = "id";

/// Query parameter carrying the last processed sequence number.
pub const PARAM_LAST_NUM: &str = "lastnum";

/// Close code by which the server rejects a resumption point.
pub const CLOSE_INVALID_RESUMPTION: u16 = 4000;

/// Substring of a close reason that rejects a resumption point.
pub const RESUMPTION_REJECTED_MARKER: &str = "lastnum";

/// Whether a close frame tells the client its resumption point was invalid.
///
/// Either the dedicated close code or a reason mentioning the rejected
/// parameter counts; the match on the reason is case-insensitive.
pub fn close_invalidates_resumption(code: Option<u16>, reason: Option<&str>) -> bool {
    if code == Some(CLOSE_INVALID_RESUMPTION) {
        return true;
    }
    reason.is_some_and(|r| r.to_ascii_lowercase().contains(RESUMPTION_REJECTED_MARKER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_code_invalidates() {
        assert!(close_invalidates_resumption(Some(4000), None));
        assert!(close_invalidates_resumption(Some(4000), Some("gone")));
    }

    #[test]
    fn test_reason_marker_invalidates() {
        assert!(close_invalidates_resumption(
            Some(1000),
            Some("Lastnum too old")
        ));
        assert!(close_invalidates_resumption(None, Some("bad lastnum")));
    }

    #[test]
    fn test_ordinary_close_does_not_invalidate() {
        assert!(!close_invalidates_resumption(Some(1000), Some("bye")));
        assert!(!close_invalidates_resumption(None, None));
        assert!(!close_invalidates_resumption(Some(1006), None));
    }
}
