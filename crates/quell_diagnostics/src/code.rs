//! Hierarchical diagnostic code strings and prefix matching.
//!
//! Diagnostic codes are dot-separated identifiers supplied by the host
//! pipeline (e.g. `error.unreported-exceptional-condition.io`). The layer
//! does not assume a fixed enumeration of codes; it only matches prefixes
//! against the families it targets.

/// The segment separator in hierarchical diagnostic codes.
pub const SEPARATOR: char = '.';

/// Returns `true` if `code` is a well-formed hierarchical code.
///
/// A well-formed code is non-empty and consists of one or more non-empty
/// segments separated by [`SEPARATOR`], where each segment contains only
/// ASCII alphanumerics, `-`, or `_`.
pub fn is_well_formed(code: &str) -> bool {
    if code.is_empty() {
        return false;
    }
    code.split(SEPARATOR).all(|segment| {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    })
}

/// Returns `true` if `prefix` matches `code` at a segment boundary.
///
/// A prefix matches the code it equals exactly, and any code that extends it
/// with further segments. It never matches a code that merely shares a
/// substring: `error.unreported` matches `error.unreported.io` but not
/// `error.unreportedfoo`.
pub fn prefix_matches(prefix: &str, code: &str) -> bool {
    if code == prefix {
        return true;
    }
    code.strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with(SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_codes() {
        assert!(is_well_formed("error.unreported-exceptional-condition"));
        assert!(is_well_formed("error.syntax.missing-semicolon"));
        assert!(is_well_formed("warning"));
        assert!(is_well_formed("note.quell.unclassifiable_code"));
    }

    #[test]
    fn malformed_codes() {
        assert!(!is_well_formed(""));
        assert!(!is_well_formed("."));
        assert!(!is_well_formed("error..unreported"));
        assert!(!is_well_formed(".error"));
        assert!(!is_well_formed("error."));
        assert!(!is_well_formed("error.un reported"));
        assert!(!is_well_formed("error.un!reported"));
    }

    #[test]
    fn exact_match_is_a_match() {
        assert!(prefix_matches("error.unreported", "error.unreported"));
    }

    #[test]
    fn boundary_aware_match() {
        assert!(prefix_matches("error.unreported", "error.unreported.io"));
        assert!(prefix_matches("error", "error.unreported"));
        assert!(!prefix_matches("error.unreported", "error.unreportedfoo"));
        assert!(!prefix_matches("error.unreported", "error.unreportedfoo.io"));
    }

    #[test]
    fn no_match_for_unrelated_codes() {
        assert!(!prefix_matches("error.unreported", "error.syntax"));
        assert!(!prefix_matches("error.unreported", "warning.unreported"));
    }
}
