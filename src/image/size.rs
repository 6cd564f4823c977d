//! Size comparison between an original and its re-encoded candidate.

use std::fs;
use std::path::Path;

/// Percentage saved by `candidate` relative to `original`.
///
/// `None` for an empty original, where no ratio exists.
#[allow(clippy::cast_precision_loss)]
pub fn percent_reduction(original: u64, candidate: u64) -> Option<f64> {
    (original > 0).then(|| (1.0 - candidate as f64 / original as f64) * 100.0)
}

/// Check whether the candidate should replace the original.
///
/// A missing candidate counts as the original's size. Equivalent to a
/// strictly positive `percent_reduction`, compared on integers so large
/// sizes do not collapse under float rounding. An empty original is never
/// improved upon.
pub fn is_smaller(original: u64, candidate: Option<u64>) -> bool {
    let candidate = candidate.unwrap_or(original);
    original > 0 && candidate < original
}

/// File-based [`is_smaller`]; an unreadable original is never replaced.
pub fn is_smaller_file(original: &Path, candidate: &Path) -> bool {
    let Ok(original) = fs::metadata(original).map(|m| m.len()) else {
        return false;
    };
    let candidate = fs::metadata(candidate).ok().map(|m| m.len());
    is_smaller(original, candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_smaller_iff_strictly_less() {
        for original in [1u64, 2, 10, 500_000, u64::MAX] {
            for candidate in [0u64, 1, original / 2, original - 1, original, original.saturating_add(1)] {
                assert_eq!(
                    is_smaller(original, Some(candidate)),
                    candidate < original,
                    "original={original} candidate={candidate}"
                );
            }
        }
    }

    #[test]
    fn test_missing_candidate_is_not_smaller() {
        assert!(!is_smaller(100, None));
    }

    #[test]
    fn test_empty_original_is_never_improved() {
        assert!(!is_smaller(0, Some(0)));
        assert!(!is_smaller(0, None));
        assert_eq!(percent_reduction(0, 0), None);
    }

    #[test]
    fn test_percent_reduction() {
        assert_eq!(percent_reduction(200, 150), Some(25.0));
        assert_eq!(percent_reduction(100, 100), Some(0.0));
        assert!(percent_reduction(100, 120).unwrap() < 0.0);
    }

    #[test]
    fn test_is_smaller_file() {
        let dir = TempDir::new().unwrap();
        let original = dir.path().join("a.png");
        let candidate = dir.path().join("a_converted.png");
        fs::write(&original, [0u8; 64]).unwrap();

        assert!(!is_smaller_file(&original, &candidate));
        fs::write(&candidate, [0u8; 32]).unwrap();
        assert!(is_smaller_file(&original, &candidate));
        fs::write(&candidate, [0u8; 64]).unwrap();
        assert!(!is_smaller_file(&original, &candidate));
        assert!(!is_smaller_file(&dir.path().join("missing.png"), &candidate));
    }
}
