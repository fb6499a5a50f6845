//! # Validator Module
//!
//! Check strutturale economico applicato sia agli upload sia all'output
//! dell'engine. Non è un parser: verifica solo che il documento abbia
//! l'aspetto di un SVG completo.

/// Opening token of the document root
pub const ROOT_OPEN: &str = "<svg";
/// Closing token of the document root
pub const ROOT_CLOSE: &str = "</svg>";
/// Trimmed documents must be strictly longer than this many characters
pub const MIN_LENGTH: usize = 20;

/// Cheap well-formedness heuristic for a candidate document
pub fn is_acceptable(candidate: &str) -> bool {
    let trimmed = candidate.trim();

    !trimmed.is_empty()
        && trimmed.starts_with(ROOT_OPEN)
        && trimmed.contains(ROOT_CLOSE)
        && trimmed.chars().count() > MIN_LENGTH
}

/// Reason a candidate was rejected, for logs and error messages
pub fn rejection_reason(candidate: &str) -> Option<String> {
    let trimmed = candidate.trim();

    if trimmed.is_empty() {
        Some("document is empty".to_string())
    } else if !trimmed.starts_with(ROOT_OPEN) {
        Some(format!("document does not start with {}", ROOT_OPEN))
    } else if !trimmed.contains(ROOT_CLOSE) {
        Some(format!("document has no closing {}", ROOT_CLOSE))
    } else if trimmed.chars().count() <= MIN_LENGTH {
        Some(format!("document is shorter than {} characters", MIN_LENGTH + 1))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_minimal_svg() {
        assert!(is_acceptable("<svg><title>x</title><!--c--></svg>"));
        assert!(is_acceptable("  \n<svg viewBox=\"0 0 1 1\"></svg>\n"));
    }

    #[test]
    fn test_rejects_non_svg() {
        assert!(!is_acceptable(""));
        assert!(!is_acceptable("   "));
        assert!(!is_acceptable("not svg"));
        assert!(!is_acceptable("<?xml version=\"1.0\"?><svg></svg>"));
        assert!(!is_acceptable("<svg width=\"10\" height=\"10\">"));
    }

    #[test]
    fn test_length_threshold() {
        // one past the threshold
        let short = "<svg a=\"12345\"></svg>";
        assert_eq!(short.chars().count(), 21);
        assert!(is_acceptable(short));

        let at_limit = "<svg a=\"1234\"></svg>";
        assert_eq!(at_limit.chars().count(), 20);
        assert!(!is_acceptable(at_limit));
    }

    #[test]
    fn test_rejection_reason_matches() {
        assert_eq!(rejection_reason("<svg a=\"12345\"></svg>"), None);
        assert!(rejection_reason("not svg").unwrap().contains("<svg"));
        assert!(rejection_reason("<svg>").unwrap().contains("</svg>"));
        assert!(rejection_reason("").unwrap().contains("empty"));
    }
}
